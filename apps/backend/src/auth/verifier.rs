//! Bearer token verification against the identity provider's signing keys.

use actix_web::http::header::HeaderValue;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use tracing::debug;

use super::claims::VerifiedClaims;
use super::error::AuthError;
use super::keys::KeyProvider;

/// Pull the token out of an `Authorization: Bearer <token>` header value.
///
/// The header must split into exactly two whitespace-separated parts, the
/// first of which is `Bearer` (case-insensitive).
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = header
        .ok_or_else(|| AuthError::invalid_header("Authorization header is expected."))?
        .to_str()
        .map_err(|_| AuthError::invalid_header("Authorization header must be bearer token."))?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [] => Err(AuthError::invalid_header(
            "Authorization header is expected.",
        )),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::invalid_header("Authorization header must start with \"Bearer\"."),
        ),
        [_] => Err(AuthError::invalid_header("Token not found.")),
        [_, token] => Ok(*token),
        _ => Err(AuthError::invalid_header(
            "Authorization header must be bearer token.",
        )),
    }
}

/// Verifies signature, issuer, audience and expiry of provider-issued tokens.
#[derive(Debug)]
pub struct TokenVerifier {
    keys: KeyProvider,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(
        keys: KeyProvider,
        issuer: &str,
        audience: &str,
        algorithm: Algorithm,
    ) -> Self {
        // Pin the algorithm; aud and iss must be present as well as correct.
        // No clock leeway: any exp in the past is expired.
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        Self { keys, validation }
    }

    /// Extract the bearer token from `header` and verify it.
    pub async fn verify_header(
        &self,
        header: Option<&HeaderValue>,
    ) -> Result<VerifiedClaims, AuthError> {
        let token = bearer_token(header)?;
        self.verify(token).await
    }

    /// Verify a raw token and return its claims.
    ///
    /// Errors:
    /// - unparseable header, missing kid, unknown kid, bad signature,
    ///   algorithm mismatch → 401 `invalid_header`
    /// - expired → 401 `token_expired`
    /// - audience/issuer mismatch → 401 `invalid_claims`
    pub async fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "token.header_unparseable");
            AuthError::invalid_header("Unable to parse authentication token.")
        })?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::invalid_header("Authorization malformed."))?;

        let key = self
            .keys
            .key_for(&kid)
            .await?
            .ok_or_else(|| AuthError::invalid_header("Unable to find the appropriate key."))?;

        decode::<VerifiedClaims>(token, &key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::token_expired(),
                ErrorKind::InvalidAudience
                | ErrorKind::InvalidIssuer
                | ErrorKind::MissingRequiredClaim(_) => AuthError::incorrect_claims(),
                ErrorKind::InvalidSignature => {
                    AuthError::invalid_header("Unable to verify token signature.")
                }
                _ => {
                    debug!(kid = %kid, error = %e, "token.decode_failed");
                    AuthError::invalid_header("Unable to parse authentication token.")
                }
            })
    }
}
