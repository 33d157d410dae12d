use axum::extract::{OriginalUri, Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::db::auth;
use crate::models::CurrentUser;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/auth/login";
pub const AUTH_ERROR_PATH: &str = "/auth/error";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const ADMIN_PREFIX: &str = "/admin";

#[derive(Debug)]
enum Access {
    Granted(CurrentUser),
    NoSession,
    NoProfile,
    NotAdmin,
}

/// Gate for everything under `/admin`, matched route or not: needs a live session whose
/// profile has the admin role. Other paths pass straight through.
pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    if !is_admin_path(&path) {
        return next.run(req).await;
    }

    let Some(token) = session_token(req.headers(), &state.config.session_cookie) else {
        return login_redirect(&path);
    };

    match check_access(&state.db, &token).await {
        Ok(Access::Granted(user)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(Access::NoSession) => login_redirect(&path),
        Ok(Access::NoProfile) => {
            warn!("session for {} has no profile", path);
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("error", "Profile not found")
                .finish();
            Redirect::temporary(&format!("{}?{}", AUTH_ERROR_PATH, query)).into_response()
        }
        Ok(Access::NotAdmin) => Redirect::temporary(UNAUTHORIZED_PATH).into_response(),
        Err(e) => {
            error!("access check failed: {}", e);
            Redirect::temporary(LOGIN_PATH).into_response()
        }
    }
}

fn is_admin_path(path: &str) -> bool {
    path.strip_prefix(ADMIN_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

async fn check_access(db: &SqlitePool, token: &str) -> Result<Access, sqlx::Error> {
    let Some(user_id) = auth::find_session_user(db, token).await? else {
        return Ok(Access::NoSession);
    };
    let Some(profile) = auth::find_profile_by_id(db, &user_id).await? else {
        return Ok(Access::NoProfile);
    };
    if !profile.is_admin() {
        return Ok(Access::NotAdmin);
    }

    Ok(Access::Granted(CurrentUser {
        id: profile.id,
        email: profile.email,
    }))
}

fn login_redirect(path: &str) -> Response {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("redirectTo", path)
        .finish();
    Redirect::temporary(&format!("{}?{}", LOGIN_PATH, query)).into_response()
}

/// Bearer token if present, otherwise the named session cookie.
fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        let bearer = bearer.trim();
        if !bearer.is_empty() {
            return Some(bearer.to_string());
        }
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
