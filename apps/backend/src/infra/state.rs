use std::sync::Arc;

use crate::auth::keys::{HttpKeySource, KeyProvider, KeySource};
use crate::auth::verifier::TokenVerifier;
use crate::config::auth::AuthSettings;
use crate::config::db::DbSettings;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    auth: Option<AuthSettings>,
    key_source: Option<Arc<dyn KeySource>>,
    db: Option<DbSettings>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            auth: None,
            key_source: None,
            db: None,
        }
    }

    pub fn with_auth(mut self, settings: AuthSettings) -> Self {
        self.auth = Some(settings);
        self
    }

    /// Replace the HTTP JWKS source derived from the auth settings.
    pub fn with_key_source(mut self, source: Arc<dyn KeySource>) -> Self {
        self.key_source = Some(source);
        self
    }

    pub fn with_db(mut self, settings: DbSettings) -> Self {
        self.db = Some(settings);
        self
    }

    pub fn with_db_url(self, url: impl Into<String>) -> Self {
        self.with_db(DbSettings::new(url))
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let auth = self
            .auth
            .ok_or_else(|| AppError::config("auth settings are required to build state"))?;

        let source = match self.key_source {
            Some(source) => source,
            None => {
                let http = HttpKeySource::new(auth.jwks_url())
                    .map_err(|e| AppError::config(format!("JWKS client: {e}")))?;
                Arc::new(http)
            }
        };

        let keys = KeyProvider::with_ttl(source, auth.cache_ttl);
        let verifier = Arc::new(TokenVerifier::new(
            keys,
            &auth.issuer(),
            &auth.audience,
            auth.algorithm,
        ));

        match self.db {
            Some(settings) => {
                let conn = bootstrap_db(&settings).await?;
                Ok(AppState::new(conn, verifier))
            }
            None => Ok(AppState::without_db(verifier)),
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
