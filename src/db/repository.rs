use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::models::{
    NewResource, NewSubject, Resource, Subject, UpdateResourceRequest, UpdateSubjectRequest,
    blank_to_none,
};
use crate::semester::SemesterKind;

const SUBJECT_COLUMNS: &str = "id, name, code, semester, old_new, created_at";
const RESOURCE_COLUMNS: &str =
    "id, subject_id, title, category, file_url, file_type, uploaded_by, created_at";

pub async fn fetch_subjects(db: &SqlitePool) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "SELECT {} FROM subjects ORDER BY semester, code, name",
        SUBJECT_COLUMNS
    ))
    .fetch_all(db)
    .await
}

pub async fn fetch_subjects_for_semester(
    db: &SqlitePool,
    semester: i32,
    kind: SemesterKind,
) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "SELECT {} FROM subjects WHERE semester = ? AND old_new = ? ORDER BY code",
        SUBJECT_COLUMNS
    ))
    .bind(semester)
    .bind(kind.as_str())
    .fetch_all(db)
    .await
}

pub async fn find_subject_by_id(db: &SqlitePool, id: &str) -> Result<Option<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!("SELECT {} FROM subjects WHERE id = ?", SUBJECT_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_subject(db: &SqlitePool, req: NewSubject) -> Result<Subject, sqlx::Error> {
    write_subject(db, req).await
}

/// Inserts every subject or none of them.
pub async fn insert_subjects(
    db: &SqlitePool,
    reqs: Vec<NewSubject>,
) -> Result<Vec<Subject>, sqlx::Error> {
    let mut tx = db.begin().await?;
    let mut inserted = Vec::with_capacity(reqs.len());

    for req in reqs {
        inserted.push(write_subject(&mut *tx, req).await?);
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn write_subject<'e, E>(executor: E, req: NewSubject) -> Result<Subject, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let subject = Subject {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        code: blank_to_none(req.code),
        semester: req.semester,
        old_new: req.old_new.unwrap_or(SemesterKind::Regular).to_string(),
        created_at: Utc::now().to_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO subjects (id, name, code, semester, old_new, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&subject.id)
    .bind(&subject.name)
    .bind(&subject.code)
    .bind(subject.semester)
    .bind(&subject.old_new)
    .bind(&subject.created_at)
    .execute(executor)
    .await?;

    Ok(subject)
}

pub async fn update_subject(
    db: &SqlitePool,
    id: &str,
    req: UpdateSubjectRequest,
) -> Result<Option<Subject>, sqlx::Error> {
    let mut current = match find_subject_by_id(db, id).await? {
        Some(s) => s,
        None => return Ok(None),
    };

    if let Some(name) = req.name {
        current.name = name.trim().to_string();
    }
    if req.code.is_some() {
        current.code = blank_to_none(req.code);
    }
    if let Some(semester) = req.semester {
        current.semester = semester;
    }
    if let Some(kind) = req.old_new {
        current.old_new = kind.to_string();
    }

    sqlx::query("UPDATE subjects SET name = ?, code = ?, semester = ?, old_new = ? WHERE id = ?")
        .bind(&current.name)
        .bind(&current.code)
        .bind(current.semester)
        .bind(&current.old_new)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(current))
}

/// Deletes a subject; its resources go with it through the foreign key cascade.
pub async fn delete_subject(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM subjects WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_resources_for_subject(
    db: &SqlitePool,
    subject_id: &str,
) -> Result<Vec<Resource>, sqlx::Error> {
    sqlx::query_as::<_, Resource>(&format!(
        "SELECT {} FROM resources WHERE subject_id = ? ORDER BY category, created_at DESC",
        RESOURCE_COLUMNS
    ))
    .bind(subject_id)
    .fetch_all(db)
    .await
}

pub async fn find_resource_by_id(
    db: &SqlitePool,
    subject_id: &str,
    id: &str,
) -> Result<Option<Resource>, sqlx::Error> {
    sqlx::query_as::<_, Resource>(&format!(
        "SELECT {} FROM resources WHERE id = ? AND subject_id = ?",
        RESOURCE_COLUMNS
    ))
    .bind(id)
    .bind(subject_id)
    .fetch_optional(db)
    .await
}

/// Inserts a batch of resources in one transaction; either all rows land or none.
pub async fn insert_resources(
    db: &SqlitePool,
    reqs: Vec<NewResource>,
) -> Result<Vec<Resource>, sqlx::Error> {
    if reqs.is_empty() {
        return Ok(Vec::new());
    }

    let mut tx = db.begin().await?;
    let mut inserted = Vec::with_capacity(reqs.len());

    for req in reqs {
        let resource = Resource {
            id: Uuid::new_v4().to_string(),
            subject_id: req.subject_id,
            title: req.title,
            category: req.category,
            file_url: req.file_url,
            file_type: req.file_type,
            uploaded_by: req.uploaded_by,
            created_at: Utc::now().to_rfc3339(),
        };

        sqlx::query(
            "INSERT INTO resources (id, subject_id, title, category, file_url, file_type, uploaded_by, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&resource.id)
        .bind(&resource.subject_id)
        .bind(&resource.title)
        .bind(&resource.category)
        .bind(&resource.file_url)
        .bind(&resource.file_type)
        .bind(&resource.uploaded_by)
        .bind(&resource.created_at)
        .execute(&mut *tx)
        .await?;

        inserted.push(resource);
    }

    tx.commit().await?;
    Ok(inserted)
}

pub async fn update_resource(
    db: &SqlitePool,
    subject_id: &str,
    id: &str,
    req: UpdateResourceRequest,
) -> Result<Option<Resource>, sqlx::Error> {
    let mut current = match find_resource_by_id(db, subject_id, id).await? {
        Some(r) => r,
        None => return Ok(None),
    };

    if let Some(title) = req.title {
        current.title = title.trim().to_string();
    }
    if let Some(category) = req.category {
        current.category = category;
    }
    if req.file_url.is_some() {
        current.file_url = blank_to_none(req.file_url);
    }

    sqlx::query("UPDATE resources SET title = ?, category = ?, file_url = ? WHERE id = ?")
        .bind(&current.title)
        .bind(&current.category)
        .bind(&current.file_url)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(current))
}

pub async fn delete_resource(db: &SqlitePool, subject_id: &str, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM resources WHERE id = ? AND subject_id = ?")
        .bind(id)
        .bind(subject_id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
