use crate::{
    database::MongoDB,
    models::{Alumni, AlumniPage, CreateAlumniRequest, UpdateAlumniRequest},
    utils::error::AppError,
};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::options::ReturnDocument;

const COLLECTION: &str = "alumni";

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 6;

fn clamp_rating(rating: f64) -> f64 {
    rating.clamp(0.0, 5.0)
}

fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

/// Admin view: all entries, newest first, skip/limit paginated.
pub async fn list_admin(db: &MongoDB, page: u64, limit: u64) -> Result<AlumniPage, AppError> {
    let collection = db.collection::<Alumni>(COLLECTION);

    let page = page.max(1);
    let limit = limit.max(1);
    let skip = (page - 1) * limit;

    let total = collection
        .count_documents(doc! {})
        .await
        .map_err(|e| AppError::Database(format!("Failed to count alumni: {}", e)))?;

    let mut cursor = collection
        .find(doc! {})
        .sort(doc! { "createdAt": -1 })
        .skip(skip)
        .limit(limit as i64)
        .await
        .map_err(|e| AppError::Database(format!("Failed to fetch alumni: {}", e)))?;

    let mut alumni = Vec::new();
    while let Some(entry) = cursor
        .try_next()
        .await
        .map_err(|e| AppError::Database(format!("Failed to read alumni: {}", e)))?
    {
        alumni.push(entry);
    }

    Ok(AlumniPage {
        alumni,
        total,
        page,
        total_pages: total_pages(total, limit),
    })
}

/// Public view: active entries only, best rated first.
pub async fn list_public(db: &MongoDB) -> Result<Vec<Alumni>, AppError> {
    let collection = db.collection::<Alumni>(COLLECTION);

    let mut cursor = collection
        .find(doc! { "isActive": true })
        .sort(doc! { "rating": -1 })
        .await
        .map_err(|e| AppError::Database(format!("Failed to fetch alumni: {}", e)))?;

    let mut alumni = Vec::new();
    while let Some(entry) = cursor
        .try_next()
        .await
        .map_err(|e| AppError::Database(format!("Failed to read alumni: {}", e)))?
    {
        alumni.push(entry);
    }

    Ok(alumni)
}

pub async fn create(db: &MongoDB, request: CreateAlumniRequest) -> Result<Alumni, AppError> {
    let collection = db.collection::<Alumni>(COLLECTION);
    let now = BsonDateTime::now();

    let mut alumni = Alumni {
        id: None,
        name: request.name,
        email: request.email,
        title: request.title,
        company: request.company,
        image_url: request.image_url,
        rating: clamp_rating(request.rating.unwrap_or(0.0)),
        sessions_completed: request.sessions_completed.unwrap_or(0),
        hourly_rate: request.hourly_rate.unwrap_or(0.0),
        is_active: request.is_active.unwrap_or(true),
        created_at: Some(now),
        updated_at: Some(now),
    };

    let inserted = collection
        .insert_one(&alumni)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create alumni: {}", e)))?;

    alumni.id = inserted.inserted_id.as_object_id();
    Ok(alumni)
}

/// Merges the provided fields into the record and stamps `updatedAt`.
pub async fn update(
    db: &MongoDB,
    id: &str,
    request: UpdateAlumniRequest,
) -> Result<Alumni, AppError> {
    let object_id = ObjectId::parse_str(id)
        .map_err(|_| AppError::Validation("Invalid alumni ID".to_string()))?;

    let mut set = Document::new();
    if let Some(name) = request.name {
        set.insert("name", name);
    }
    if let Some(email) = request.email {
        set.insert("email", email);
    }
    if let Some(title) = request.title {
        set.insert("title", title);
    }
    if let Some(company) = request.company {
        set.insert("company", company);
    }
    if let Some(image_url) = request.image_url {
        set.insert("imageUrl", image_url);
    }
    if let Some(rating) = request.rating {
        set.insert("rating", clamp_rating(rating));
    }
    if let Some(sessions_completed) = request.sessions_completed {
        set.insert("sessionsCompleted", sessions_completed);
    }
    if let Some(hourly_rate) = request.hourly_rate {
        set.insert("hourlyRate", hourly_rate);
    }
    if let Some(is_active) = request.is_active {
        set.insert("isActive", is_active);
    }
    set.insert("updatedAt", BsonDateTime::now());

    let updated = db
        .collection::<Alumni>(COLLECTION)
        .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update alumni: {}", e)))?;

    updated.ok_or_else(|| AppError::NotFound("Alumni not found".to_string()))
}

pub async fn delete(db: &MongoDB, id: &str) -> Result<(), AppError> {
    let object_id = ObjectId::parse_str(id)
        .map_err(|_| AppError::Validation("Invalid alumni ID".to_string()))?;

    let result = db
        .collection::<Alumni>(COLLECTION)
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(format!("Failed to delete alumni: {}", e)))?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Alumni not found".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        // 10 records at 6 per page: page 1 holds 6, page 2 the remaining 4
        assert_eq!(total_pages(10, 6), 2);
        assert_eq!(total_pages(12, 6), 2);
        assert_eq!(total_pages(13, 6), 3);
        assert_eq!(total_pages(0, 6), 0);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_rating_is_clamped() {
        assert_eq!(clamp_rating(4.5), 4.5);
        assert_eq!(clamp_rating(-1.0), 0.0);
        assert_eq!(clamp_rating(9.9), 5.0);
    }

    #[test]
    fn test_invalid_object_id_is_rejected() {
        assert!(ObjectId::parse_str("not-an-id").is_err());
    }
}
