use std::env;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

use super::{must_var, parse_var};
use crate::auth::keys::DEFAULT_CACHE_TTL;
use crate::error::AppError;

/// Identity provider settings used to build the token verifier.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSettings {
    /// Tenant domain, e.g. `coffee-shop.auth0.com`
    pub domain: String,
    /// API identifier expected in the `aud` claim
    pub audience: String,
    pub algorithm: Algorithm,
    /// Explicit JWKS URL; derived from the domain when `None`
    pub jwks_url: Option<String>,
    pub cache_ttl: Duration,
}

impl AuthSettings {
    pub fn new(domain: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            audience: audience.into(),
            algorithm: Algorithm::RS256,
            jwks_url: None,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Read `AUTH0_DOMAIN`, `API_AUDIENCE`, `AUTH0_ALGORITHM`, `AUTH0_JWKS_URL`
    /// and `JWKS_CACHE_TTL_SECS`.
    pub fn from_env() -> Result<Self, AppError> {
        let domain = normalize_domain(&must_var("AUTH0_DOMAIN")?);
        let audience = must_var("API_AUDIENCE")?;

        let algorithm = match env::var("AUTH0_ALGORITHM") {
            Ok(raw) if !raw.trim().is_empty() => parse_algorithm(raw.trim())?,
            _ => Algorithm::RS256,
        };

        let jwks_url = env::var("AUTH0_JWKS_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let ttl_secs = parse_var("JWKS_CACHE_TTL_SECS", DEFAULT_CACHE_TTL.as_secs())?;

        Ok(Self {
            domain,
            audience,
            algorithm,
            jwks_url,
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }

    /// Expected `iss` claim: `https://<domain>/`
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn jwks_url(&self) -> String {
        self.jwks_url
            .clone()
            .unwrap_or_else(|| format!("https://{}/.well-known/jwks.json", self.domain))
    }
}

fn normalize_domain(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("https://")
        .trim_end_matches('/')
        .to_string()
}

/// Only asymmetric algorithms make sense with JWKS-published keys.
fn parse_algorithm(raw: &str) -> Result<Algorithm, AppError> {
    let algorithm = Algorithm::from_str(raw)
        .map_err(|_| AppError::config(format!("Unknown AUTH0_ALGORITHM '{raw}'")))?;
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Err(AppError::config(format!(
            "AUTH0_ALGORITHM '{raw}' is symmetric; JWKS verification needs an asymmetric algorithm"
        ))),
        other => Ok(other),
    }
}
