use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::error::AuthError;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::infra::db_errors::map_db_err;

/// JSON body rendered for every error path.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
    pub code: &'static str,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Unprocessable: {detail}")]
    Unprocessable { detail: String },
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Conflict: {detail}")]
    Conflict { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Database unavailable")]
    DbUnavailable,
}

impl AppError {
    /// Machine-readable code included in the error body
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Auth(e) => e.code().as_str(),
            AppError::NotFound { .. } => "not_found",
            AppError::Unprocessable { .. } => "unprocessable",
            AppError::MethodNotAllowed => "method_not_allowed",
            AppError::Conflict { .. } => "conflict",
            AppError::Internal { .. } | AppError::Config { .. } => "internal",
            AppError::DbUnavailable => "db_unavailable",
        }
    }

    /// Client-facing message; server-side details are never exposed
    pub fn message(&self) -> String {
        match self {
            AppError::Auth(e) => e.description().to_string(),
            AppError::NotFound { detail } => detail.clone(),
            AppError::Unprocessable { detail } => detail.clone(),
            AppError::MethodNotAllowed => "Method Not Allowed".to_string(),
            AppError::Conflict { detail } => detail.clone(),
            AppError::Internal { .. } | AppError::Config { .. } => {
                "Internal Server Error".to_string()
            }
            AppError::DbUnavailable => "Database unavailable".to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(e) => e.status(),
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DbUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::Unprocessable {
            detail: detail.into(),
        }
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::Conflict {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn db_unavailable() -> Self {
        Self::DbUnavailable
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(detail) => AppError::Unprocessable { detail },
            DomainError::Conflict(_, detail) => AppError::Conflict { detail },
            DomainError::NotFound(_, detail) => AppError::NotFound { detail },
            DomainError::Infra(InfraErrorKind::DbUnavailable, _) => AppError::DbUnavailable,
            DomainError::Infra(kind, detail) => AppError::Internal {
                detail: format!("{kind:?}: {detail}"),
            },
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e).into()
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        HttpResponse::build(status).json(ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.message(),
            code: self.code(),
        })
    }
}
