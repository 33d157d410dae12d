use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

use crate::api::{deleted, require_date, require_text};
use crate::db::content::{self, PublicationKind};
use crate::error::AppError;
use crate::models::{
    CurrentUser, Event, Faculty, NewEventRequest, NewFacultyRequest, NewPublicationRequest,
    Publication, UpdateEventRequest, UpdateFacultyRequest, UpdatePublicationRequest,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/faculty", get(list_faculty).post(create_faculty))
        .route(
            "/faculty/{id}",
            get(get_faculty).patch(update_faculty).delete(delete_faculty),
        )
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .nest("/newsletters", publication_router(PublicationKind::Newsletter))
        .nest("/student-corner", publication_router(PublicationKind::Notice))
}

/// Newsletters and notices share handlers; the table is picked by the layered kind.
fn publication_router(kind: PublicationKind) -> Router<AppState> {
    Router::new()
        .route("/", get(list_publications).post(create_publication))
        .route(
            "/{id}",
            get(get_publication)
                .patch(update_publication)
                .delete(delete_publication),
        )
        .layer(Extension(kind))
}

async fn list_faculty(State(state): State<AppState>) -> Result<Json<Vec<Faculty>>, AppError> {
    Ok(Json(content::fetch_faculty(&state.db).await?))
}

async fn get_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Faculty>, AppError> {
    let faculty = content::find_faculty_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(faculty))
}

async fn create_faculty(
    State(state): State<AppState>,
    Json(req): Json<NewFacultyRequest>,
) -> Result<(StatusCode, Json<Faculty>), AppError> {
    require_text("name", &req.name)?;
    require_text("designation", &req.designation)?;
    require_date("joining_date", req.joining_date.as_deref())?;

    let faculty = content::insert_faculty(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(faculty)))
}

async fn update_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFacultyRequest>,
) -> Result<Json<Faculty>, AppError> {
    if let Some(name) = &req.name {
        require_text("name", name)?;
    }
    if let Some(designation) = &req.designation {
        require_text("designation", designation)?;
    }
    require_date("joining_date", req.joining_date.as_deref())?;

    let faculty = content::update_faculty(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(faculty))
}

async fn delete_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(content::delete_faculty(&state.db, &id).await?)
}

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(content::fetch_events(&state.db).await?))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    let event = content::find_event_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(event))
}

async fn create_event(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<NewEventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    require_text("title", &req.title)?;
    require_date("date", req.date.as_deref())?;

    let event = content::insert_event(&state.db, req, Some(user.id)).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    if let Some(title) = &req.title {
        require_text("title", title)?;
    }
    require_date("date", req.date.as_deref())?;

    let event = content::update_event(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(event))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(content::delete_event(&state.db, &id).await?)
}

async fn list_publications(
    State(state): State<AppState>,
    Extension(kind): Extension<PublicationKind>,
) -> Result<Json<Vec<Publication>>, AppError> {
    Ok(Json(content::fetch_publications(&state.db, kind).await?))
}

async fn get_publication(
    State(state): State<AppState>,
    Extension(kind): Extension<PublicationKind>,
    Path(id): Path<String>,
) -> Result<Json<Publication>, AppError> {
    let publication = content::find_publication_by_id(&state.db, kind, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(publication))
}

async fn create_publication(
    State(state): State<AppState>,
    Extension(kind): Extension<PublicationKind>,
    Json(req): Json<NewPublicationRequest>,
) -> Result<(StatusCode, Json<Publication>), AppError> {
    require_text("title", &req.title)?;

    let publication = content::insert_publication(&state.db, kind, req).await?;
    Ok((StatusCode::CREATED, Json(publication)))
}

async fn update_publication(
    State(state): State<AppState>,
    Extension(kind): Extension<PublicationKind>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePublicationRequest>,
) -> Result<Json<Publication>, AppError> {
    if let Some(title) = &req.title {
        require_text("title", title)?;
    }

    let publication = content::update_publication(&state.db, kind, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(publication))
}

async fn delete_publication(
    State(state): State<AppState>,
    Extension(kind): Extension<PublicationKind>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(content::delete_publication(&state.db, kind, &id).await?)
}
