use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Uploaded PDF metadata (stored in MongoDB).
///
/// `branch` holds the normalized short code, `path` the final location under
/// the uploads root. Records are write-once: no update or delete endpoint.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub filename: String,
    pub branch: String,
    pub semester: String,
    pub category: String,
    pub path: String,
    pub uploaded_at: Option<BsonDateTime>,
}

/// Entry produced by the filesystem scan of the uploads tree.
#[derive(Debug, Serialize, PartialEq)]
pub struct ScannedPdf {
    pub filename: String,
    pub path: String,
    pub branch: String,
    pub semester: String,
    pub category: String,
}
