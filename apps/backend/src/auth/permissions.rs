//! Scope checks against already-verified claims.

use super::claims::VerifiedClaims;
use super::error::AuthError;

/// Check that `claims` grant `required` by exact set membership.
///
/// Errors:
/// - no `permissions` claim at all → 400 `invalid_claims`
/// - claim present but `required` absent → 403 `unauthorized`
pub fn check_permission(required: &str, claims: &VerifiedClaims) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_deref()
        .ok_or_else(AuthError::permissions_missing)?;

    if granted.iter().any(|p| p == required) {
        Ok(())
    } else {
        Err(AuthError::permission_not_found())
    }
}
