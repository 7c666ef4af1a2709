use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::verifier::TokenVerifier;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Verifier for provider-issued bearer tokens; owns the signing key cache
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, verifier: Arc<TokenVerifier>) -> Self {
        Self {
            db: Some(db),
            verifier,
        }
    }

    /// State without a database; data routes answer 503.
    pub fn without_db(verifier: Arc<TokenVerifier>) -> Self {
        Self { db: None, verifier }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }
}
