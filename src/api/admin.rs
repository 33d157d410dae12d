use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};
use serde::Serialize;

use crate::api::{deleted, require_text};
use crate::db::content::{self, DashboardCounts};
use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    BulkSubjectRow, CurrentUser, Feedback, NewResource, NewResourceRow, NewSubject, Resource,
    Subject, UpdateResourceRequest, UpdateSubjectRequest, blank_to_none,
};
use crate::semester::parse_semester_slug;
use crate::state::AppState;

const RECENT_FEEDBACK: i64 = 5;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub email: String,
    pub counts: DashboardCounts,
    pub recent_feedback: Vec<Feedback>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/subjects", get(list_subjects).post(create_subject))
        .route("/subjects/bulk", post(create_subjects_bulk))
        .route(
            "/subjects/{id}",
            get(get_subject).patch(update_subject).delete(delete_subject),
        )
        .route(
            "/subjects/{id}/resources",
            get(list_resources).post(create_resources),
        )
        .route(
            "/subjects/{id}/resources/{rid}",
            get(get_resource).patch(update_resource).delete(delete_resource),
        )
        .route("/feedback", get(list_feedback))
        .route("/feedback/{id}", delete(delete_feedback))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Dashboard>, AppError> {
    let counts = content::fetch_dashboard_counts(&state.db).await?;
    let recent_feedback = content::fetch_feedback(&state.db, Some(RECENT_FEEDBACK)).await?;
    Ok(Json(Dashboard {
        email: user.email,
        counts,
        recent_feedback,
    }))
}

async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>, AppError> {
    Ok(Json(repository::fetch_subjects(&state.db).await?))
}

async fn create_subject(
    State(state): State<AppState>,
    Json(req): Json<NewSubject>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    require_text("name", &req.name)?;
    if req.semester < 1 {
        return Err(AppError::BadRequest("semester must be positive".to_string()));
    }

    let subject = repository::insert_subject(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

/// Rows without a name or with an unknown semester slug are left out; at least one must remain.
async fn create_subjects_bulk(
    State(state): State<AppState>,
    Json(rows): Json<Vec<BulkSubjectRow>>,
) -> Result<(StatusCode, Json<Vec<Subject>>), AppError> {
    let payload: Vec<NewSubject> = rows
        .into_iter()
        .filter(|row| !row.name.trim().is_empty())
        .filter_map(|row| {
            let semester = parse_semester_slug(&row.semester_slug)?;
            Some(NewSubject {
                name: row.name,
                code: row.code,
                semester: i32::try_from(semester.number).ok()?,
                old_new: Some(semester.kind),
            })
        })
        .collect();

    if payload.is_empty() {
        return Err(AppError::BadRequest(
            "Please fill in at least one valid subject.".to_string(),
        ));
    }

    let subjects = repository::insert_subjects(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(subjects)))
}

async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Subject>, AppError> {
    let subject = repository::find_subject_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(subject))
}

async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSubjectRequest>,
) -> Result<Json<Subject>, AppError> {
    if let Some(name) = &req.name {
        require_text("name", name)?;
    }
    let subject = repository::update_subject(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(subject))
}

async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(repository::delete_subject(&state.db, &id).await?)
}

async fn list_resources(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Resource>>, AppError> {
    repository::find_subject_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(repository::fetch_resources_for_subject(&state.db, &id).await?))
}

async fn create_resources(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(rows): Json<Vec<NewResourceRow>>,
) -> Result<(StatusCode, Json<Vec<Resource>>), AppError> {
    let subject = repository::find_subject_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let payload: Vec<NewResource> = rows
        .into_iter()
        .filter(|row| !row.title.trim().is_empty() && !row.category.trim().is_empty())
        .map(|row| NewResource {
            subject_id: subject.id.clone(),
            title: row.title.trim().to_string(),
            category: row.category.trim().to_string(),
            file_url: blank_to_none(row.file_url),
            file_type: None,
            uploaded_by: Some(user.id.clone()),
        })
        .collect();

    if payload.is_empty() {
        return Err(AppError::BadRequest(
            "Please enter at least one valid resource.".to_string(),
        ));
    }

    let resources = repository::insert_resources(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(resources)))
}

async fn get_resource(
    State(state): State<AppState>,
    Path((id, rid)): Path<(String, String)>,
) -> Result<Json<Resource>, AppError> {
    let resource = repository::find_resource_by_id(&state.db, &id, &rid)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(resource))
}

async fn update_resource(
    State(state): State<AppState>,
    Path((id, rid)): Path<(String, String)>,
    Json(req): Json<UpdateResourceRequest>,
) -> Result<Json<Resource>, AppError> {
    if let Some(title) = &req.title {
        require_text("title", title)?;
    }
    if let Some(category) = &req.category {
        require_text("category", category)?;
    }
    let resource = repository::update_resource(&state.db, &id, &rid, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(resource))
}

async fn delete_resource(
    State(state): State<AppState>,
    Path((id, rid)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    deleted(repository::delete_resource(&state.db, &id, &rid).await?)
}

async fn list_feedback(State(state): State<AppState>) -> Result<Json<Vec<Feedback>>, AppError> {
    Ok(Json(content::fetch_feedback(&state.db, None).await?))
}

async fn delete_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(content::delete_feedback(&state.db, &id).await?)
}
