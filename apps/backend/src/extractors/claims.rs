use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::claims::VerifiedClaims;
use crate::auth::error::AuthError;
use crate::error::AppError;

/// Claims placed in request extensions by `RequirePermission`.
///
/// Extracting outside a guarded resource fails the same way a request
/// without an Authorization header does.
impl FromRequest for VerifiedClaims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<VerifiedClaims>().cloned();
        ready(claims.ok_or_else(|| {
            AuthError::invalid_header("Authorization header is expected.").into()
        }))
    }
}
