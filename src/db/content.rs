use chrono::Utc;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::models::{
    Event, Faculty, Feedback, NewEventRequest, NewFacultyRequest, NewFeedbackRequest,
    NewPublicationRequest, Publication, UpdateEventRequest, UpdateFacultyRequest,
    UpdatePublicationRequest, blank_to_none,
};

const FACULTY_COLUMNS: &str =
    "id, name, designation, qualification, photo_url, contact, experience, joining_date, created_at";

pub async fn fetch_faculty(db: &SqlitePool) -> Result<Vec<Faculty>, sqlx::Error> {
    sqlx::query_as::<_, Faculty>(&format!(
        "SELECT {} FROM faculty ORDER BY created_at ASC",
        FACULTY_COLUMNS
    ))
    .fetch_all(db)
    .await
}

pub async fn find_faculty_by_id(db: &SqlitePool, id: &str) -> Result<Option<Faculty>, sqlx::Error> {
    sqlx::query_as::<_, Faculty>(&format!("SELECT {} FROM faculty WHERE id = ?", FACULTY_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_faculty(db: &SqlitePool, req: NewFacultyRequest) -> Result<Faculty, sqlx::Error> {
    let faculty = Faculty {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        designation: req.designation.trim().to_string(),
        qualification: blank_to_none(req.qualification),
        photo_url: blank_to_none(req.photo_url),
        contact: blank_to_none(req.contact),
        experience: blank_to_none(req.experience),
        joining_date: blank_to_none(req.joining_date),
        created_at: Utc::now().to_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO faculty (id, name, designation, qualification, photo_url, contact, experience, joining_date, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&faculty.id)
    .bind(&faculty.name)
    .bind(&faculty.designation)
    .bind(&faculty.qualification)
    .bind(&faculty.photo_url)
    .bind(&faculty.contact)
    .bind(&faculty.experience)
    .bind(&faculty.joining_date)
    .bind(&faculty.created_at)
    .execute(db)
    .await?;

    Ok(faculty)
}

pub async fn update_faculty(
    db: &SqlitePool,
    id: &str,
    req: UpdateFacultyRequest,
) -> Result<Option<Faculty>, sqlx::Error> {
    let mut current = match find_faculty_by_id(db, id).await? {
        Some(f) => f,
        None => return Ok(None),
    };

    if let Some(name) = req.name {
        current.name = name.trim().to_string();
    }
    if let Some(designation) = req.designation {
        current.designation = designation.trim().to_string();
    }
    if req.qualification.is_some() {
        current.qualification = blank_to_none(req.qualification);
    }
    if req.photo_url.is_some() {
        current.photo_url = blank_to_none(req.photo_url);
    }
    if req.contact.is_some() {
        current.contact = blank_to_none(req.contact);
    }
    if req.experience.is_some() {
        current.experience = blank_to_none(req.experience);
    }
    if req.joining_date.is_some() {
        current.joining_date = blank_to_none(req.joining_date);
    }

    sqlx::query(
        "UPDATE faculty SET name = ?, designation = ?, qualification = ?, photo_url = ?, contact = ?, experience = ?, joining_date = ? WHERE id = ?",
    )
    .bind(&current.name)
    .bind(&current.designation)
    .bind(&current.qualification)
    .bind(&current.photo_url)
    .bind(&current.contact)
    .bind(&current.experience)
    .bind(&current.joining_date)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn delete_faculty(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    delete_by_id(db, "faculty", id).await
}

/// Row shape of `events`; image URLs are kept as a JSON array in one column.
#[derive(Debug, FromRow)]
struct EventRow {
    id: String,
    title: String,
    description: Option<String>,
    images: String,
    date: Option<String>,
    location: Option<String>,
    created_by: Option<String>,
    created_at: String,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        let images = serde_json::from_str(&row.images).unwrap_or_else(|e| {
            tracing::warn!("event {} has unreadable image list: {}", row.id, e);
            Vec::new()
        });
        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            images,
            date: row.date,
            location: row.location,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

const EVENT_COLUMNS: &str = "id, title, description, images, date, location, created_by, created_at";

pub async fn fetch_events(db: &SqlitePool) -> Result<Vec<Event>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {} FROM events ORDER BY date DESC, created_at DESC",
        EVENT_COLUMNS
    ))
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Event::from).collect())
}

pub async fn find_event_by_id(db: &SqlitePool, id: &str) -> Result<Option<Event>, sqlx::Error> {
    let row = sqlx::query_as::<_, EventRow>(&format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(row.map(Event::from))
}

fn clean_images(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

fn images_json(images: &[String]) -> String {
    serde_json::to_string(images).unwrap_or_else(|_| "[]".to_string())
}

pub async fn insert_event(
    db: &SqlitePool,
    req: NewEventRequest,
    created_by: Option<String>,
) -> Result<Event, sqlx::Error> {
    let event = Event {
        id: Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        description: blank_to_none(req.description),
        images: clean_images(req.images),
        date: blank_to_none(req.date),
        location: blank_to_none(req.location),
        created_by,
        created_at: Utc::now().to_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO events (id, title, description, images, date, location, created_by, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&event.id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(images_json(&event.images))
    .bind(&event.date)
    .bind(&event.location)
    .bind(&event.created_by)
    .bind(&event.created_at)
    .execute(db)
    .await?;

    Ok(event)
}

pub async fn update_event(
    db: &SqlitePool,
    id: &str,
    req: UpdateEventRequest,
) -> Result<Option<Event>, sqlx::Error> {
    let mut current = match find_event_by_id(db, id).await? {
        Some(e) => e,
        None => return Ok(None),
    };

    if let Some(title) = req.title {
        current.title = title.trim().to_string();
    }
    if req.description.is_some() {
        current.description = blank_to_none(req.description);
    }
    if let Some(images) = req.images {
        current.images = clean_images(images);
    }
    if req.date.is_some() {
        current.date = blank_to_none(req.date);
    }
    if req.location.is_some() {
        current.location = blank_to_none(req.location);
    }

    sqlx::query(
        "UPDATE events SET title = ?, description = ?, images = ?, date = ?, location = ? WHERE id = ?",
    )
    .bind(&current.title)
    .bind(&current.description)
    .bind(images_json(&current.images))
    .bind(&current.date)
    .bind(&current.location)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn delete_event(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    delete_by_id(db, "events", id).await
}

/// Tables holding [`Publication`] rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationKind {
    Newsletter,
    Notice,
}

impl PublicationKind {
    fn table(&self) -> &'static str {
        match self {
            PublicationKind::Newsletter => "newsletters",
            PublicationKind::Notice => "students_corner",
        }
    }
}

pub async fn fetch_publications(
    db: &SqlitePool,
    kind: PublicationKind,
) -> Result<Vec<Publication>, sqlx::Error> {
    sqlx::query_as::<_, Publication>(&format!(
        "SELECT id, title, description, file_url, created_at FROM {} ORDER BY created_at DESC",
        kind.table()
    ))
    .fetch_all(db)
    .await
}

pub async fn find_publication_by_id(
    db: &SqlitePool,
    kind: PublicationKind,
    id: &str,
) -> Result<Option<Publication>, sqlx::Error> {
    sqlx::query_as::<_, Publication>(&format!(
        "SELECT id, title, description, file_url, created_at FROM {} WHERE id = ?",
        kind.table()
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_publication(
    db: &SqlitePool,
    kind: PublicationKind,
    req: NewPublicationRequest,
) -> Result<Publication, sqlx::Error> {
    let publication = Publication {
        id: Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        description: blank_to_none(req.description),
        file_url: blank_to_none(req.file_url),
        created_at: Utc::now().to_rfc3339(),
    };

    sqlx::query(&format!(
        "INSERT INTO {} (id, title, description, file_url, created_at) VALUES (?, ?, ?, ?, ?)",
        kind.table()
    ))
    .bind(&publication.id)
    .bind(&publication.title)
    .bind(&publication.description)
    .bind(&publication.file_url)
    .bind(&publication.created_at)
    .execute(db)
    .await?;

    Ok(publication)
}

pub async fn update_publication(
    db: &SqlitePool,
    kind: PublicationKind,
    id: &str,
    req: UpdatePublicationRequest,
) -> Result<Option<Publication>, sqlx::Error> {
    let mut current = match find_publication_by_id(db, kind, id).await? {
        Some(p) => p,
        None => return Ok(None),
    };

    if let Some(title) = req.title {
        current.title = title.trim().to_string();
    }
    if req.description.is_some() {
        current.description = blank_to_none(req.description);
    }
    if req.file_url.is_some() {
        current.file_url = blank_to_none(req.file_url);
    }

    sqlx::query(&format!(
        "UPDATE {} SET title = ?, description = ?, file_url = ? WHERE id = ?",
        kind.table()
    ))
    .bind(&current.title)
    .bind(&current.description)
    .bind(&current.file_url)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn delete_publication(
    db: &SqlitePool,
    kind: PublicationKind,
    id: &str,
) -> Result<bool, sqlx::Error> {
    delete_by_id(db, kind.table(), id).await
}

pub async fn insert_feedback(db: &SqlitePool, req: NewFeedbackRequest) -> Result<Feedback, sqlx::Error> {
    let feedback = Feedback {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        category: blank_to_none(req.category),
        message: req.message.trim().to_string(),
        created_at: Utc::now().to_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO feedback (id, name, email, category, message, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&feedback.id)
    .bind(&feedback.name)
    .bind(&feedback.email)
    .bind(&feedback.category)
    .bind(&feedback.message)
    .bind(&feedback.created_at)
    .execute(db)
    .await?;

    Ok(feedback)
}

/// Newest feedback first; `limit` caps the list when given.
pub async fn fetch_feedback(db: &SqlitePool, limit: Option<i64>) -> Result<Vec<Feedback>, sqlx::Error> {
    sqlx::query_as::<_, Feedback>(
        "SELECT id, name, email, category, message, created_at FROM feedback ORDER BY created_at DESC LIMIT ?",
    )
    .bind(limit.unwrap_or(-1))
    .fetch_all(db)
    .await
}

pub async fn delete_feedback(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    delete_by_id(db, "feedback", id).await
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DashboardCounts {
    pub newsletters: i64,
    pub resources: i64,
    pub events: i64,
    pub subjects: i64,
    pub faculty: i64,
    pub notices: i64,
}

pub async fn fetch_dashboard_counts(db: &SqlitePool) -> Result<DashboardCounts, sqlx::Error> {
    Ok(DashboardCounts {
        newsletters: count_rows(db, "newsletters").await?,
        resources: count_rows(db, "resources").await?,
        events: count_rows(db, "events").await?,
        subjects: count_rows(db, "subjects").await?,
        faculty: count_rows(db, "faculty").await?,
        notices: count_rows(db, "students_corner").await?,
    })
}

async fn count_rows(db: &SqlitePool, table: &'static str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(db)
        .await
}

async fn delete_by_id(db: &SqlitePool, table: &'static str, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table))
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
