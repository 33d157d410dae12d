use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::semester::SemesterKind;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    pub semester: i32,
    pub old_new: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubject {
    pub name: String,
    pub code: Option<String>,
    pub semester: i32,
    #[serde(default)]
    pub old_new: Option<SemesterKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub semester: Option<i32>,
    pub old_new: Option<SemesterKind>,
}

/// One line of the admin "bulk add subjects" table; the semester is picked by slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSubjectRow {
    pub name: String,
    pub code: Option<String>,
    pub semester_slug: String,
}
