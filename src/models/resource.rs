use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resource {
    pub id: String,
    pub subject_id: String,
    pub title: String,
    pub category: String,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub uploaded_by: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewResource {
    pub subject_id: String,
    pub title: String,
    pub category: String,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub uploaded_by: Option<String>,
}

/// Resource as entered on the admin form; the subject comes from the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewResourceRow {
    pub title: String,
    pub category: String,
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResourceRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub file_url: Option<String>,
}
