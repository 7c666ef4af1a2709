//! Bearer token verification and permission enforcement.

pub mod claims;
pub mod error;
pub mod guard;
pub mod keys;
pub mod permissions;
pub mod verifier;

pub use claims::{Permission, VerifiedClaims};
pub use error::{AuthError, AuthErrorCode};
pub use keys::{HttpKeySource, KeyProvider, KeySource, StaticKeySource};
pub use permissions::check_permission;
pub use verifier::{bearer_token, TokenVerifier};
