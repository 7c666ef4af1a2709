#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod state;

// Re-exports for public API
pub use auth::{
    AuthError, AuthErrorCode, KeyProvider, KeySource, Permission, TokenVerifier, VerifiedClaims,
};
pub use config::auth::AuthSettings;
pub use config::db::DbSettings;
pub use config::server::ServerSettings;
pub use error::AppError;
pub use infra::state::{build_state, StateBuilder};
pub use middleware::request_trace::RequestTrace;
pub use middleware::require_permission::RequirePermission;
pub use middleware::structured_logger::StructuredLogger;
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
