use actix_web::{web, HttpRequest};
use tracing::debug;

use crate::error::AppError;

pub mod drinks;
pub mod health;

/// Register every route. Shared by `main.rs` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(drinks::configure_routes);
}

/// App-level fallback: unknown paths get the JSON 404 body.
pub async fn not_found(req: HttpRequest) -> Result<&'static str, AppError> {
    debug!(path = %req.path(), method = %req.method(), "route.not_found");
    Err(AppError::not_found("Resource Not Found"))
}
