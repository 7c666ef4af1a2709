//! JWT token generation helpers for tests
//!
//! Tokens are signed with fixed RSA fixtures so the backend can verify them
//! against a JWKS document built from the matching public components, exactly
//! as it would against the identity provider's well-known endpoint.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Map, Value};

pub const TEST_DOMAIN: &str = "coffee-shop-test.auth0.com";
pub const TEST_ISSUER: &str = "https://coffee-shop-test.auth0.com/";
pub const TEST_AUDIENCE: &str = "drinks";
pub const TEST_SUBJECT: &str = "auth0|barista";

const TRUSTED_PEM: &[u8] = include_bytes!("../fixtures/trusted_rsa.pem");
const TRUSTED_MODULUS: &str = include_str!("../fixtures/trusted_rsa.modulus");
const ROGUE_PEM: &[u8] = include_bytes!("../fixtures/rogue_rsa.pem");
const ROGUE_MODULUS: &str = include_str!("../fixtures/rogue_rsa.modulus");

/// RSA key pairs available to tests.
///
/// `Trusted` is published in the default test JWKS. `Rogue` is only published
/// when a test explicitly simulates a key rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningKey {
    Trusted,
    Rogue,
}

impl SigningKey {
    pub const fn kid(self) -> &'static str {
        match self {
            Self::Trusted => "trusted-key-1",
            Self::Rogue => "rogue-key-1",
        }
    }

    fn pem(self) -> &'static [u8] {
        match self {
            Self::Trusted => TRUSTED_PEM,
            Self::Rogue => ROGUE_PEM,
        }
    }

    fn modulus(self) -> &'static str {
        match self {
            Self::Trusted => TRUSTED_MODULUS.trim(),
            Self::Rogue => ROGUE_MODULUS.trim(),
        }
    }

    /// Public half of the key as a JWK, shaped like an Auth0 JWKS entry.
    pub fn jwk(self) -> Value {
        json!({
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": self.kid(),
            "n": self.modulus(),
            "e": "AQAB",
        })
    }
}

/// JWKS document publishing the given keys.
pub fn jwks(keys: &[SigningKey]) -> Value {
    json!({ "keys": keys.iter().map(|k| k.jwk()).collect::<Vec<_>>() })
}

/// JWKS document publishing only the trusted key.
pub fn trusted_jwks() -> Value {
    jwks(&[SigningKey::Trusted])
}

pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_secs() as i64
}

/// Builder for identity-provider style access tokens.
///
/// Defaults: signed by the trusted key with its kid, valid issuer and
/// audience, one hour until expiry, and no `permissions` claim.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    key: SigningKey,
    kid: Option<String>,
    claims: Map<String, Value>,
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenBuilder {
    pub fn new() -> Self {
        let now = now_secs();
        let mut claims = Map::new();
        claims.insert("iss".into(), json!(TEST_ISSUER));
        claims.insert("aud".into(), json!(TEST_AUDIENCE));
        claims.insert("sub".into(), json!(TEST_SUBJECT));
        claims.insert("iat".into(), json!(now));
        claims.insert("exp".into(), json!(now + 3600));
        Self {
            key: SigningKey::Trusted,
            kid: Some(SigningKey::Trusted.kid().to_string()),
            claims,
        }
    }

    pub fn permissions(self, permissions: &[&str]) -> Self {
        self.claim("permissions", json!(permissions))
    }

    pub fn audience(self, audience: &str) -> Self {
        self.claim("aud", json!(audience))
    }

    pub fn issuer(self, issuer: &str) -> Self {
        self.claim("iss", json!(issuer))
    }

    /// Set `exp` relative to now; negative values produce an expired token.
    pub fn expires_in(self, seconds: i64) -> Self {
        self.claim("exp", json!(now_secs() + seconds))
    }

    /// Sign with `key` while keeping the current `kid` header.
    pub fn signed_by(mut self, key: SigningKey) -> Self {
        self.key = key;
        self
    }

    /// Sign with `key` and advertise its own kid.
    pub fn key(mut self, key: SigningKey) -> Self {
        self.key = key;
        self.kid = Some(key.kid().to_string());
        self
    }

    pub fn kid(mut self, kid: Option<&str>) -> Self {
        self.kid = kid.map(str::to_string);
        self
    }

    pub fn claim(mut self, name: &str, value: Value) -> Self {
        self.claims.insert(name.to_string(), value);
        self
    }

    pub fn without_claim(mut self, name: &str) -> Self {
        self.claims.remove(name);
        self
    }

    pub fn sign(self) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.kid;
        let key = EncodingKey::from_rsa_pem(self.key.pem()).expect("fixture PEM should parse");
        encode(&header, &self.claims, &key).expect("should mint token successfully")
    }

    /// Sign with a shared secret (HS256), for algorithm-confusion tests.
    pub fn sign_with_secret(self, secret: &[u8]) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = self.kid;
        encode(&header, &self.claims, &EncodingKey::from_secret(secret))
            .expect("should mint token successfully")
    }

    /// Full Authorization header value including the "Bearer " prefix.
    pub fn bearer(self) -> String {
        format!("Bearer {}", self.sign())
    }
}

/// Authorization header value for a valid token carrying `permissions`.
pub fn bearer_with_permissions(permissions: &[&str]) -> String {
    TokenBuilder::new().permissions(permissions).bearer()
}
