//! Environment-driven settings for the auth layer, the database and the server.

pub mod auth;
pub mod db;
pub mod server;

use std::env;

use crate::error::AppError;

/// Get required environment variable or return error
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("Required environment variable '{name}' is not set")))
}

/// Parse an optional environment variable, falling back to `default` when unset.
pub(crate) fn parse_var<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map_err(|e| {
            AppError::config(format!("Invalid value for '{name}': {raw:?} ({e})"))
        }),
        _ => Ok(default),
    }
}

/// Boolean flag: `1`, `true`, `yes` and `on` (any case) are true.
pub(crate) fn flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
