mod admin;
mod content;
mod import;
mod public;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Router, middleware};
use chrono::NaiveDate;
use tracing::error;

use crate::auth::{ADMIN_PREFIX, require_admin};
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let admin = admin::router()
        .merge(content::router())
        .merge(import::router());

    // Layered over the whole tree so unmatched admin paths hit the gate too.
    Router::new()
        .route("/health", get(health))
        .merge(public::router())
        .nest(ADMIN_PREFIX, admin)
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("select 1").execute(&state.db).await {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            error!("health check failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// 204 when a row was removed, 404 otherwise.
fn deleted(found: bool) -> Result<StatusCode, AppError> {
    if found {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}

/// Accepts absent or blank dates; anything else must be `YYYY-MM-DD`.
fn require_date(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| AppError::BadRequest(format!("{} must be a YYYY-MM-DD date", field))),
        None => Ok(()),
    }
}
