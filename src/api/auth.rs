use actix_web::{web, HttpRequest, HttpResponse};
use crate::{
    database::MongoDB,
    middleware::auth::{bearer_from_request, BearerToken},
    services::auth_service,
    services::auth_service::{
        AdminAuthRequest, LoginRequest, SignupRequest, UserClaims, VerifyEmailRequest,
    },
    utils::blacklist::TokenBlacklist,
    utils::error::AppError,
};

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Email or roll number already registered")
    )
)]
pub async fn signup(db: web::Data<MongoDB>, request: web::Json<SignupRequest>) -> HttpResponse {
    log::info!("📝 POST /auth/signup - email: {}", request.email);

    match auth_service::signup(&db, &request).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => {
            log::warn!("❌ Signup failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(db: web::Data<MongoDB>, request: web::Json<LoginRequest>) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Token revoked"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    blacklist: web::Data<TokenBlacklist>,
    token: web::ReqData<BearerToken>,
) -> HttpResponse {
    log::info!("👋 POST /auth/logout");

    auth_service::logout(&blacklist, &token.0);
    HttpResponse::Ok().json(serde_json::json!({ "message": "Logged out successfully" }))
}

#[utoipa::path(
    get,
    path = "/api/user/profile",
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated user's profile"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn profile(db: web::Data<MongoDB>, user: web::ReqData<UserClaims>) -> HttpResponse {
    log::info!("👤 GET /user/profile - user: {}", user.id);

    match auth_service::profile(&db, &user.id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => {
            log::warn!("❌ Profile fetch failed: {} - {}", user.id, e);
            e.to_response()
        }
    }
}

/// Passthrough to the external email verification provider.
pub async fn verify_email(request: web::Json<VerifyEmailRequest>) -> HttpResponse {
    log::info!("📧 POST /auth/verify-email");

    let user_json_url = match &request.user_json_url {
        Some(url) => url,
        None => return AppError::Validation("Missing user_json_url".to_string()).to_response(),
    };

    match auth_service::fetch_verified_email(user_json_url).await {
        Ok(email) => {
            log::info!("✅ Verified email: {}", email);
            HttpResponse::Ok().json(serde_json::json!({ "email": email }))
        }
        Err(e) => e.to_response(),
    }
}

pub async fn admin_signup(
    db: web::Data<MongoDB>,
    request: web::Json<AdminAuthRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/admin/signup - email: {}", request.email);

    match auth_service::admin_signup(&db, &request).await {
        Ok(message) => HttpResponse::Created().json(serde_json::json!({ "message": message })),
        Err(e) => {
            log::warn!("❌ Admin signup failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/admin/login",
    tag = "Auth",
    request_body = AdminAuthRequest,
    responses(
        (status = 200, description = "Login successful, token carries the admin role claim"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn admin_login(
    db: web::Data<MongoDB>,
    request: web::Json<AdminAuthRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/admin/login - email: {}", request.email);

    match auth_service::admin_login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Admin login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Admin login failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

pub async fn admin_verify(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    log::info!("✓ GET /auth/admin/verify");

    let token = match bearer_from_request(&req) {
        Some(token) => token,
        None => return AppError::Authentication("No token provided".to_string()).to_response(),
    };

    match auth_service::admin_verify(&db, &token).await {
        Ok(admin) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Admin verified",
            "admin": admin,
        })),
        Err(e) => {
            log::warn!("❌ Admin verification failed: {}", e);
            e.to_response()
        }
    }
}
