use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Faculty {
    pub id: String,
    pub name: String,
    pub designation: String,
    pub qualification: Option<String>,
    pub photo_url: Option<String>,
    pub contact: Option<String>,
    pub experience: Option<String>,
    pub joining_date: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFacultyRequest {
    pub name: String,
    pub designation: String,
    pub qualification: Option<String>,
    pub photo_url: Option<String>,
    pub contact: Option<String>,
    pub experience: Option<String>,
    pub joining_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFacultyRequest {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub qualification: Option<String>,
    pub photo_url: Option<String>,
    pub contact: Option<String>,
    pub experience: Option<String>,
    pub joining_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEventRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub date: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub date: Option<String>,
    pub location: Option<String>,
}

/// Newsletter issue or student-corner notice; both tables share this shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Publication {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPublicationRequest {
    pub title: String,
    pub description: Option<String>,
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePublicationRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: String,
    pub name: String,
    pub email: String,
    pub category: Option<String>,
    pub message: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedbackRequest {
    pub name: String,
    pub email: String,
    pub category: Option<String>,
    pub message: String,
}
