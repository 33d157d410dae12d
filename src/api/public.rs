use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::api::require_text;
use crate::catalog::{ResourceSection, group_by_main_category};
use crate::db::content::{self, PublicationKind};
use crate::db::repository;
use crate::error::AppError;
use crate::models::{Event, Faculty, Feedback, NewFeedbackRequest, Publication, Subject};
use crate::semester::{SemesterInfo, available_semesters, parse_semester_slug};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SemesterPage {
    pub semester: SemesterInfo,
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Serialize)]
pub struct SubjectPage {
    pub semester: SemesterInfo,
    pub subject: Subject,
    pub sections: Vec<ResourceSection>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/course-materials", get(list_semesters))
        .route("/course-materials/{slug}", get(semester_subjects))
        .route("/course-materials/{slug}/{subject_id}", get(subject_resources))
        .route("/faculty", get(list_faculty))
        .route("/events", get(list_events))
        .route("/newsletters", get(list_newsletters))
        .route("/student-corner", get(list_notices))
        .route("/feedback", post(submit_feedback))
}

async fn list_semesters() -> Json<Vec<SemesterInfo>> {
    Json(available_semesters())
}

async fn semester_subjects(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<SemesterPage>, AppError> {
    let semester = parse_semester_slug(&slug).ok_or(AppError::NotFound)?;
    let number = i32::try_from(semester.number).map_err(|_| AppError::NotFound)?;

    let subjects = repository::fetch_subjects_for_semester(&state.db, number, semester.kind).await?;
    Ok(Json(SemesterPage { semester, subjects }))
}

async fn subject_resources(
    State(state): State<AppState>,
    Path((slug, subject_id)): Path<(String, String)>,
) -> Result<Json<SubjectPage>, AppError> {
    let semester = parse_semester_slug(&slug).ok_or(AppError::NotFound)?;
    let subject = repository::find_subject_by_id(&state.db, &subject_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let resources = repository::fetch_resources_for_subject(&state.db, &subject.id).await?;
    Ok(Json(SubjectPage {
        semester,
        subject,
        sections: group_by_main_category(resources),
    }))
}

async fn list_faculty(State(state): State<AppState>) -> Result<Json<Vec<Faculty>>, AppError> {
    Ok(Json(content::fetch_faculty(&state.db).await?))
}

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(content::fetch_events(&state.db).await?))
}

async fn list_newsletters(State(state): State<AppState>) -> Result<Json<Vec<Publication>>, AppError> {
    Ok(Json(content::fetch_publications(&state.db, PublicationKind::Newsletter).await?))
}

async fn list_notices(State(state): State<AppState>) -> Result<Json<Vec<Publication>>, AppError> {
    Ok(Json(content::fetch_publications(&state.db, PublicationKind::Notice).await?))
}

async fn submit_feedback(
    State(state): State<AppState>,
    Json(req): Json<NewFeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), AppError> {
    require_text("name", &req.name)?;
    require_text("message", &req.message)?;
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("email must be a valid address".to_string()));
    }

    let feedback = content::insert_feedback(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}
