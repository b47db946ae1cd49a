use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures::TryStreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    database::MongoDB,
    services::resource_service,
    services::resource_service::ResourceFilters,
    utils::error::AppError,
};

// Collects a text part of the multipart form
async fn text_value(field: &mut Field) -> Result<String, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart field: {}", e)))?
    {
        data.extend_from_slice(&chunk);
    }
    String::from_utf8(data)
        .map_err(|_| AppError::Validation("Malformed multipart field".to_string()))
}

// Streams the file part into the uploads root under its timestamped name.
// The classified move happens after the form is fully validated.
async fn save_temp_file(
    field: &mut Field,
    uploads_root: &Path,
) -> Result<(PathBuf, String), AppError> {
    let original = field
        .content_disposition()
        .get_filename()
        .unwrap_or("upload.pdf")
        .to_string();
    let filename = resource_service::stamped_filename(&original, Utc::now().timestamp_millis());
    let temp_path = uploads_root.join(&filename);

    std::fs::create_dir_all(uploads_root)
        .map_err(|e| AppError::Internal(format!("Failed to create uploads directory: {}", e)))?;

    let mut file = std::fs::File::create(&temp_path)
        .map_err(|e| AppError::Internal(format!("Failed to create upload file: {}", e)))?;

    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| AppError::Internal(format!("Upload stream error: {}", e)))?
    {
        file = web::block(move || file.write_all(&chunk).map(|_| file))
            .await
            .map_err(|e| AppError::Internal(format!("Upload write failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Upload write failed: {}", e)))?;
    }

    Ok((temp_path, filename))
}

#[utoipa::path(
    post,
    path = "/api/upload/pdf",
    tag = "Resources",
    responses(
        (status = 201, description = "File stored under its branch/semester/category directory"),
        (status = 400, description = "Missing classification fields or file"),
        (status = 500, description = "Directory creation or file move failed")
    )
)]
pub async fn upload_pdf(
    db: web::Data<MongoDB>,
    config: web::Data<Config>,
    mut payload: Multipart,
) -> HttpResponse {
    log::info!("📤 POST /upload/pdf");

    let uploads_root = PathBuf::from(&config.upload_dir);

    let mut branch: Option<String> = None;
    let mut semester: Option<String> = None;
    let mut category: Option<String> = None;
    let mut saved: Option<(PathBuf, String)> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let name = field.name().to_string();
        match name.as_str() {
            "branch" | "semester" | "category" => {
                let value = match text_value(&mut field).await {
                    Ok(value) => value,
                    Err(e) => return e.to_response(),
                };
                match name.as_str() {
                    "branch" => branch = Some(value),
                    "semester" => semester = Some(value),
                    _ => category = Some(value),
                }
            }
            "pdf" => {
                saved = match save_temp_file(&mut field, &uploads_root).await {
                    Ok(parts) => Some(parts),
                    Err(e) => return e.to_response(),
                };
            }
            _ => {
                // Unknown parts are drained and ignored
                while let Ok(Some(_)) = field.try_next().await {}
            }
        }
    }

    let (branch, semester, category) = match (branch, semester, category) {
        (Some(b), Some(s), Some(c)) if !b.is_empty() && !s.is_empty() && !c.is_empty() => (b, s, c),
        _ => {
            return AppError::Validation("Missing branch, semester, or category".to_string())
                .to_response()
        }
    };

    let (temp_path, filename) = match saved {
        Some(parts) => parts,
        None => return AppError::Validation("No file uploaded".to_string()).to_response(),
    };

    match resource_service::finalize_upload(
        &db,
        &uploads_root,
        &temp_path,
        &filename,
        &branch,
        &semester,
        &category,
    )
    .await
    {
        Ok(resource) => HttpResponse::Created().json(serde_json::json!({
            "message": "File uploaded successfully",
            "file": resource.filename,
            "path": resource.path,
        })),
        Err(e) => {
            log::error!("❌ Error saving file: {}", e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/pdfs",
    tag = "Resources",
    params(
        ("branch" = Option<String>, Query, description = "Normalized branch code"),
        ("semester" = Option<String>, Query, description = "Semester number"),
        ("category" = Option<String>, Query, description = "Resource category")
    ),
    responses(
        (status = 200, description = "Resource records matching the filters")
    )
)]
pub async fn list_pdfs(
    db: web::Data<MongoDB>,
    query: web::Query<ResourceFilters>,
) -> HttpResponse {
    log::info!("📄 GET /pdfs - filters: {:?}", query);

    match resource_service::list_resources(&db, &query).await {
        Ok(resources) => HttpResponse::Ok().json(resources),
        Err(e) => {
            log::error!("❌ Error fetching PDFs: {}", e);
            e.to_response()
        }
    }
}

/// Filesystem-scan variant of the listing; walks the uploads tree instead of
/// querying the database.
pub async fn list_uploaded_pdfs(
    config: web::Data<Config>,
    query: web::Query<ResourceFilters>,
) -> HttpResponse {
    log::info!("📄 GET /uploads/pdfs - filters: {:?}", query);

    let uploads_root = PathBuf::from(&config.upload_dir);
    let filters = query.into_inner();

    match web::block(move || resource_service::scan_uploads(&uploads_root, &filters)).await {
        Ok(pdfs) => HttpResponse::Ok().json(pdfs),
        Err(e) => AppError::Internal(format!("Failed to scan uploads: {}", e)).to_response(),
    }
}
