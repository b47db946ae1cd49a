use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Alumni mentor entry (stored in MongoDB).
///
/// Rating is kept inside [0, 5]; values outside the range are clamped on
/// create and update. No uniqueness is enforced on any field.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Alumni {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub sessions_completed: i32,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

fn default_is_active() -> bool {
    true
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlumniRequest {
    pub name: String,
    pub email: String,
    pub title: String,
    pub company: String,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub sessions_completed: Option<i32>,
    pub hourly_rate: Option<f64>,
    pub is_active: Option<bool>,
}

/// Partial update; only provided fields are written.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlumniRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub sessions_completed: Option<i32>,
    pub hourly_rate: Option<f64>,
    pub is_active: Option<bool>,
}

/// One page of the admin listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlumniPage {
    pub alumni: Vec<Alumni>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}
