use chrono::{Duration, Utc};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::queries;
use crate::models::{Admin, AdminRole};

const ADMIN_SESSION_TTL_HOURS: i64 = 12;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

/// Make sure the configured admin account exists. Runs once at startup.
pub fn seed_admin(conn: &Connection, config: &AppConfig) -> anyhow::Result<()> {
    if queries::get_admin_by_username(conn, &config.admin_username)?.is_some() {
        return Ok(());
    }

    let hash = bcrypt::hash(&config.admin_password, bcrypt::DEFAULT_COST)?;
    queries::insert_admin(conn, &config.admin_username, &hash, AdminRole::Owner)?;
    tracing::info!(username = %config.admin_username, "seeded admin account");
    Ok(())
}

#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub admin: Admin,
}

/// Unknown usernames and wrong passwords are indistinguishable to the
/// caller.
pub fn login(conn: &Connection, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
    let admin =
        queries::get_admin_by_username(conn, username)?.ok_or(AuthError::InvalidCredentials)?;

    let valid = bcrypt::verify(password, &admin.password_hash)
        .map_err(|e| AuthError::Db(e.into()))?;
    if !valid {
        return Err(AuthError::InvalidCredentials);
    }

    let token = uuid::Uuid::new_v4().to_string();
    let expires_at = Utc::now().naive_utc() + Duration::hours(ADMIN_SESSION_TTL_HOURS);
    queries::create_admin_session(conn, &token, admin.id, &expires_at)?;

    tracing::info!(username = %admin.username, "admin logged in");
    Ok(LoginOutcome { token, admin })
}

pub fn authenticate(conn: &Connection, token: &str) -> anyhow::Result<Option<Admin>> {
    queries::get_session_admin(conn, token)
}

pub fn logout(conn: &Connection, token: &str) -> anyhow::Result<bool> {
    queries::delete_admin_session(conn, token)
}
