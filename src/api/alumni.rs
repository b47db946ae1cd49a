use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::{
    database::MongoDB,
    models::{CreateAlumniRequest, UpdateAlumniRequest},
    services::alumni_service,
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/admin/alumni",
    tag = "Alumni",
    params(
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<u64>, Query, description = "Entries per page (default 6)")
    ),
    responses(
        (status = 200, description = "One page of alumni, newest first"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_admin(db: web::Data<MongoDB>, query: web::Query<PageQuery>) -> HttpResponse {
    let page = query.page.unwrap_or(alumni_service::DEFAULT_PAGE);
    let limit = query.limit.unwrap_or(alumni_service::DEFAULT_LIMIT);

    log::info!("📋 GET /admin/alumni - page: {}, limit: {}", page, limit);

    match alumni_service::list_admin(&db, page, limit).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::error!("❌ Error fetching alumni: {}", e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/alumni",
    tag = "Alumni",
    responses(
        (status = 200, description = "Active alumni, best rated first")
    )
)]
pub async fn list_public(db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("📋 GET /alumni");

    match alumni_service::list_public(&db).await {
        Ok(alumni) => HttpResponse::Ok().json(alumni),
        Err(e) => {
            log::error!("❌ Error fetching alumni: {}", e);
            e.to_response()
        }
    }
}

pub async fn create(
    db: web::Data<MongoDB>,
    request: web::Json<CreateAlumniRequest>,
) -> HttpResponse {
    log::info!("📝 POST /admin/alumni - {}", request.name);

    match alumni_service::create(&db, request.into_inner()).await {
        Ok(alumni) => HttpResponse::Created().json(alumni),
        Err(e) => {
            log::error!("❌ Error creating alumni: {}", e);
            e.to_response()
        }
    }
}

pub async fn update(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateAlumniRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    log::info!("🔧 PUT /admin/alumni/{}", id);

    match alumni_service::update(&db, &id, request.into_inner()).await {
        Ok(alumni) => HttpResponse::Ok().json(alumni),
        Err(e) => {
            log::warn!("❌ Error updating alumni {}: {}", id, e);
            e.to_response()
        }
    }
}

pub async fn delete(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    log::info!("🗑️ DELETE /admin/alumni/{}", id);

    match alumni_service::delete(&db, &id).await {
        Ok(()) => {
            HttpResponse::Ok().json(serde_json::json!({ "message": "Alumni deleted successfully" }))
        }
        Err(e) => {
            log::warn!("❌ Error deleting alumni {}: {}", id, e);
            e.to_response()
        }
    }
}
