mod common;
mod support;

use actix_web::http::header::HeaderValue;
use actix_web::http::StatusCode;
use backend_test_support::jwt::{SigningKey, TokenBuilder, TEST_SUBJECT};
use coffee_backend::auth::guard::authorize;
use coffee_backend::auth::keys::KeyProvider;
use coffee_backend::auth::{AuthError, AuthErrorCode, TokenVerifier};
use jsonwebtoken::Algorithm;
use serde_json::json;
use support::test_state::{test_auth_settings, trusted_key_source};

fn verifier() -> TokenVerifier {
    let settings = test_auth_settings();
    TokenVerifier::new(
        KeyProvider::new(trusted_key_source()),
        &settings.issuer(),
        &settings.audience,
        Algorithm::RS256,
    )
}

fn assert_auth_error(err: AuthError, status: StatusCode, code: AuthErrorCode, description: &str) {
    assert_eq!(err.status(), status);
    assert_eq!(err.code(), code);
    assert_eq!(err.description(), description);
}

#[tokio::test]
async fn test_valid_token_yields_claims() {
    let token = TokenBuilder::new()
        .permissions(&["get:drinks-detail"])
        .claim("scope", json!("openid"))
        .sign();

    let claims = verifier().verify(&token).await.unwrap();
    assert_eq!(claims.sub.as_deref(), Some(TEST_SUBJECT));
    assert!(claims.has_permission("get:drinks-detail"));
    assert_eq!(claims.get("scope"), Some(&json!("openid")));
}

#[tokio::test]
async fn test_expired_token() {
    let token = TokenBuilder::new().expires_in(-600).sign();
    let err = verifier().verify(&token).await.unwrap_err();
    assert_auth_error(
        err,
        StatusCode::UNAUTHORIZED,
        AuthErrorCode::TokenExpired,
        "Token expired.",
    );
}

#[tokio::test]
async fn test_recently_expired_token_is_rejected() {
    for seconds_ago in [-1, -10, -30] {
        let token = TokenBuilder::new()
            .permissions(&["get:drinks-detail"])
            .expires_in(seconds_ago)
            .sign();
        let err = verifier().verify(&token).await.unwrap_err();
        assert_eq!(err.code(), AuthErrorCode::TokenExpired, "exp = now{seconds_ago}");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_wrong_audience() {
    let token = TokenBuilder::new().audience("espresso-machine").sign();
    let err = verifier().verify(&token).await.unwrap_err();
    assert_auth_error(
        err,
        StatusCode::UNAUTHORIZED,
        AuthErrorCode::InvalidClaims,
        "Incorrect claims. Please, check the audience and issuer.",
    );
}

#[tokio::test]
async fn test_wrong_issuer() {
    let token = TokenBuilder::new()
        .issuer("https://evil.example.com/")
        .sign();
    let err = verifier().verify(&token).await.unwrap_err();
    assert_eq!(err.code(), AuthErrorCode::InvalidClaims);
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_audience_claim() {
    let token = TokenBuilder::new().without_claim("aud").sign();
    let err = verifier().verify(&token).await.unwrap_err();
    assert_eq!(err.code(), AuthErrorCode::InvalidClaims);
}

#[tokio::test]
async fn test_untrusted_key_under_trusted_kid() {
    let token = TokenBuilder::new().signed_by(SigningKey::Rogue).sign();
    let err = verifier().verify(&token).await.unwrap_err();
    assert_auth_error(
        err,
        StatusCode::UNAUTHORIZED,
        AuthErrorCode::InvalidHeader,
        "Unable to verify token signature.",
    );
}

#[tokio::test]
async fn test_unknown_kid() {
    let token = TokenBuilder::new().key(SigningKey::Rogue).sign();
    let err = verifier().verify(&token).await.unwrap_err();
    assert_auth_error(
        err,
        StatusCode::UNAUTHORIZED,
        AuthErrorCode::InvalidHeader,
        "Unable to find the appropriate key.",
    );
}

#[tokio::test]
async fn test_token_without_kid() {
    let token = TokenBuilder::new().kid(None).sign();
    let err = verifier().verify(&token).await.unwrap_err();
    assert_auth_error(
        err,
        StatusCode::UNAUTHORIZED,
        AuthErrorCode::InvalidHeader,
        "Authorization malformed.",
    );
}

#[tokio::test]
async fn test_symmetric_token_is_rejected() {
    let token = TokenBuilder::new().sign_with_secret(b"not-a-provider-key");
    let err = verifier().verify(&token).await.unwrap_err();
    assert_eq!(err.code(), AuthErrorCode::InvalidHeader);
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token() {
    let err = verifier().verify("definitely.not.a-jwt").await.unwrap_err();
    assert_auth_error(
        err,
        StatusCode::UNAUTHORIZED,
        AuthErrorCode::InvalidHeader,
        "Unable to parse authentication token.",
    );
}

#[tokio::test]
async fn test_authorize_checks_permission_after_verification() {
    let verifier = verifier();

    let header = HeaderValue::from_str(
        &TokenBuilder::new()
            .permissions(&["patch:drinks"])
            .bearer(),
    )
    .unwrap();
    let claims = authorize(&verifier, Some(&header), "patch:drinks")
        .await
        .unwrap();
    assert!(claims.has_permission("patch:drinks"));

    let err = authorize(&verifier, Some(&header), "delete:drinks")
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    // Verification failures win over permission checks.
    let expired = HeaderValue::from_str(
        &TokenBuilder::new()
            .permissions(&["patch:drinks"])
            .expires_in(-600)
            .bearer(),
    )
    .unwrap();
    let err = authorize(&verifier, Some(&expired), "patch:drinks")
        .await
        .unwrap_err();
    assert_eq!(err.code(), AuthErrorCode::TokenExpired);
}
