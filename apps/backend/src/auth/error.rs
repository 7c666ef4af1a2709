//! Typed authentication and authorization failures.

use core::fmt;
use std::borrow::Cow;

use actix_web::http::StatusCode;
use thiserror::Error;

/// Machine-readable auth failure codes, as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    /// Missing, malformed or unverifiable token
    InvalidHeader,
    /// Token `exp` is in the past
    TokenExpired,
    /// Well-formed token failing semantic validation
    InvalidClaims,
    /// Valid token lacking the required permission
    Unauthorized,
}

impl AuthErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidHeader => "invalid_header",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            Self::Unauthorized => "unauthorized",
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable auth failure carrying its own HTTP status.
///
/// Raised wherever verification or permission checks fail and rendered once,
/// by [`crate::error::AppError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {description}")]
pub struct AuthError {
    status: StatusCode,
    code: AuthErrorCode,
    description: Cow<'static, str>,
}

impl AuthError {
    pub fn new(
        status: StatusCode,
        code: AuthErrorCode,
        description: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            status,
            code,
            description: description.into(),
        }
    }

    pub fn invalid_header(description: impl Into<Cow<'static, str>>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            AuthErrorCode::InvalidHeader,
            description,
        )
    }

    pub fn token_expired() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            AuthErrorCode::TokenExpired,
            "Token expired.",
        )
    }

    /// Audience or issuer mismatch.
    pub fn incorrect_claims() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            AuthErrorCode::InvalidClaims,
            "Incorrect claims. Please, check the audience and issuer.",
        )
    }

    pub fn permissions_missing() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            AuthErrorCode::InvalidClaims,
            "Permissions not included in JWT.",
        )
    }

    pub fn permission_not_found() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            AuthErrorCode::Unauthorized,
            "Permission not found.",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> AuthErrorCode {
        self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
