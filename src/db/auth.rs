use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::Profile;

pub async fn find_profile_by_id(db: &SqlitePool, id: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "SELECT id, email, full_name, role, created_at FROM profiles WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_profile_by_email(db: &SqlitePool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "SELECT id, email, full_name, role, created_at FROM profiles WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn insert_profile(
    db: &SqlitePool,
    email: &str,
    full_name: Option<String>,
    role: &str,
) -> Result<Profile, sqlx::Error> {
    let profile = Profile {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        full_name,
        role: role.to_string(),
        created_at: Utc::now().to_rfc3339(),
    };

    sqlx::query("INSERT INTO profiles (id, email, full_name, role, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&profile.id)
        .bind(&profile.email)
        .bind(&profile.full_name)
        .bind(&profile.role)
        .bind(&profile.created_at)
        .execute(db)
        .await?;

    Ok(profile)
}

pub async fn set_profile_role(db: &SqlitePool, id: &str, role: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE profiles SET role = ? WHERE id = ?")
        .bind(role)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Creates a session for `user_id` and returns its bearer token.
pub async fn create_session(
    db: &SqlitePool,
    user_id: &str,
    ttl: Duration,
) -> Result<String, sqlx::Error> {
    let token = Uuid::new_v4().simple().to_string();
    let now = Utc::now();

    sqlx::query("INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)")
        .bind(&token)
        .bind(user_id)
        .bind((now + ttl).to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(db)
        .await?;

    Ok(token)
}

/// User id behind a live session token; expired or unknown tokens yield `None`.
pub async fn find_session_user(db: &SqlitePool, token: &str) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT user_id, expires_at FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(db)
            .await?;

    Ok(row.and_then(|(user_id, expires_at)| {
        let expires_at = chrono::DateTime::parse_from_rfc3339(&expires_at).ok()?;
        (expires_at > Utc::now()).then_some(user_id)
    }))
}
