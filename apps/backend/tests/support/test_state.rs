use std::sync::Arc;

use backend_test_support::jwt::{trusted_jwks, TEST_AUDIENCE, TEST_DOMAIN};
use coffee_backend::auth::keys::{KeySource, StaticKeySource};
use coffee_backend::config::auth::AuthSettings;
use coffee_backend::infra::state::{build_state, StateBuilder};
use coffee_backend::state::app_state::AppState;
use jsonwebtoken::jwk::JwkSet;

/// Auth settings matching the tokens minted by `backend_test_support::jwt`.
pub fn test_auth_settings() -> AuthSettings {
    AuthSettings::new(TEST_DOMAIN, TEST_AUDIENCE)
}

/// Key source pinned to the trusted test key.
pub fn trusted_key_source() -> Arc<dyn KeySource> {
    let keys: JwkSet =
        serde_json::from_value(trusted_jwks()).expect("trusted JWKS fixture should parse");
    Arc::new(StaticKeySource::new(keys))
}

pub fn test_state_builder() -> StateBuilder {
    build_state()
        .with_auth(test_auth_settings())
        .with_key_source(trusted_key_source())
}

/// Fresh in-memory SQLite database with the drinks table created.
pub async fn build_test_state() -> AppState {
    test_state_builder()
        .with_db_url("sqlite::memory:")
        .build()
        .await
        .expect("test state should build")
}

pub async fn build_test_state_without_db() -> AppState {
    test_state_builder()
        .build()
        .await
        .expect("test state should build")
}
