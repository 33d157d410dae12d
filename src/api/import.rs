use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::import::{
    BulkImporter, ImportReport, SkippedRow, SubjectRecord, TEMPLATE_FILE_NAME, parse_csv,
    template_csv,
};
use crate::models::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ImportPreview {
    pub subjects: Vec<SubjectRecord>,
    pub skipped_rows: usize,
    pub skipped: Vec<SkippedRow>,
    pub log: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub subjects: Vec<SubjectRecord>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/import", post(run_import))
        .route("/import/template", get(download_template))
        .route("/import/preview", post(preview_import))
}

async fn download_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", TEMPLATE_FILE_NAME),
            ),
        ],
        template_csv(),
    )
}

/// Parses an uploaded sheet without touching the database.
async fn preview_import(body: String) -> Result<Json<ImportPreview>, AppError> {
    let mut log = vec!["Processing CSV…".to_string()];
    let parsed = parse_csv(body.as_bytes())?;
    for skipped in &parsed.skipped {
        log.push(format!("Row {} skipped: {}", skipped.row, skipped.reason));
    }
    log.push(format!("Detected {} subjects.", parsed.subjects.len()));

    info!(
        "import preview: {} subjects, {} rows skipped",
        parsed.subjects.len(),
        parsed.skipped_rows
    );

    Ok(Json(ImportPreview {
        subjects: parsed.subjects,
        skipped_rows: parsed.skipped_rows,
        skipped: parsed.skipped,
        log,
    }))
}

async fn run_import(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportReport>, AppError> {
    if req.subjects.is_empty() {
        return Err(AppError::BadRequest("No subjects to import".to_string()));
    }
    if let Some(bad) = req.subjects.iter().find(|s| s.semester < 1) {
        return Err(AppError::BadRequest(format!(
            "semester of {} ({}) must be positive",
            bad.name, bad.code
        )));
    }

    let report = BulkImporter::new(state.catalog.clone())
        .with_uploader(user.id)
        .run(&req.subjects)
        .await;

    Ok(Json(report))
}
