use std::env;

use super::{flag, must_var};
use crate::error::AppError;

/// Database connection and bootstrap settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DbSettings {
    pub url: String,
    /// Drop and recreate the drinks table on startup
    pub reset_on_start: bool,
    /// Insert the demo drink when the table is empty
    pub seed_demo: bool,
}

impl DbSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reset_on_start: false,
            seed_demo: false,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            url: database_url()?,
            reset_on_start: flag("DB_RESET_ON_START"),
            seed_demo: flag("DB_SEED_DEMO"),
        })
    }
}

/// `DATABASE_URL` when set, otherwise a Postgres URL built from `POSTGRES_*`.
pub fn database_url() -> Result<String, AppError> {
    if let Ok(url) = env::var("DATABASE_URL") {
        if !url.trim().is_empty() {
            return Ok(url.trim().to_string());
        }
    }

    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    let db_name = must_var("POSTGRES_DB")?;
    let username = must_var("POSTGRES_USER")?;
    let password = must_var("POSTGRES_PASSWORD")?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}
