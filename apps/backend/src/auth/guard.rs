//! Verify-then-check composition applied in front of protected handlers.

use actix_web::http::header::HeaderValue;
use tracing::debug;

use super::claims::VerifiedClaims;
use super::error::AuthError;
use super::permissions::check_permission;
use super::verifier::TokenVerifier;

/// Authorize a request for `permission`.
///
/// Returns the verified claims only when the token is valid *and* grants the
/// permission; the caller must not run the protected operation otherwise.
pub async fn authorize(
    verifier: &TokenVerifier,
    header: Option<&HeaderValue>,
    permission: &str,
) -> Result<VerifiedClaims, AuthError> {
    let claims = verifier.verify_header(header).await?;
    check_permission(permission, &claims)?;

    debug!(
        sub = claims.sub.as_deref().unwrap_or("-"),
        permission, "auth.authorized"
    );
    Ok(claims)
}
