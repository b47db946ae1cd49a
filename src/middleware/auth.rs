use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    web, Error, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::database::MongoDB;
use crate::services::auth_service;
use crate::utils::blacklist::TokenBlacklist;
use crate::utils::error::AppError;

/// Raw bearer token, stashed in request extensions for handlers that need
/// the exact presented string (logout revokes it verbatim).
#[derive(Clone)]
pub struct BearerToken(pub String);

pub fn bearer_from_request(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}

// Auth failures still answer with the JSON `{message}` shape
fn deny(error: AppError) -> Error {
    let response = error.to_response();
    InternalError::from_response(error.to_string(), response).into()
}

/// Guards user routes: bearer token present, not revoked, signature and
/// expiry valid. Claims and the raw token land in request extensions.
pub struct UserAuth;

impl<S, B> Transform<S, ServiceRequest> for UserAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = UserAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(UserAuthService { service }))
    }
}

pub struct UserAuthService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for UserAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match bearer_from_request(req.request()) {
            Some(token) => token,
            None => {
                return Box::pin(async move {
                    Err(deny(AppError::Authentication("No token provided".to_string())))
                })
            }
        };

        let revoked = req
            .app_data::<web::Data<TokenBlacklist>>()
            .map(|blacklist| blacklist.contains(&token))
            .unwrap_or(false);
        if revoked {
            return Box::pin(async move {
                Err(deny(AppError::Authentication(
                    "Token has been invalidated".to_string(),
                )))
            });
        }

        match auth_service::verify_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                req.extensions_mut().insert(BearerToken(token));
                let fut = self.service.call(req);
                Box::pin(async move { fut.await })
            }
            Err(error) => Box::pin(async move { Err(deny(error)) }),
        }
    }
}

/// Guards admin routes: everything `UserAuth` checks, plus the `role` claim
/// and a lookup confirming the admin account still exists.
pub struct AdminAuth;

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthService {
            service: Rc::new(service),
        }))
    }
}

pub struct AdminAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match bearer_from_request(req.request()) {
                Some(token) => token,
                None => {
                    return Err(deny(AppError::Authentication(
                        "No token provided".to_string(),
                    )))
                }
            };

            let claims = match auth_service::verify_admin_token(&token) {
                Ok(claims) => claims,
                Err(error) => return Err(deny(error)),
            };

            let db = match req.app_data::<web::Data<MongoDB>>() {
                Some(db) => db.clone(),
                None => {
                    return Err(deny(AppError::Internal(
                        "Database not configured".to_string(),
                    )))
                }
            };

            // A token issued for a since-deleted admin stops working here
            match auth_service::find_admin(&db, &claims.id).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    return Err(deny(AppError::Authentication("Admin not found".to_string())))
                }
                Err(error) => return Err(deny(error)),
            }

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
