//! Claims carried by a verified identity-provider access token.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Verified token claims, inserted into request extensions by the
/// permission guard. Request-scoped and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedClaims {
    /// Subject (identity provider user id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiry (seconds since epoch)
    pub exp: u64,
    /// Granted permission scopes; `None` when the claim is absent entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// Every other claim (`iss`, `aud`, `iat`, `azp`, ...) as plain key-value data
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerifiedClaims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }
}

/// Permission scopes guarding the drinks API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    GetDrinksDetail,
    PostDrinks,
    PatchDrinks,
    DeleteDrinks,
}

impl Permission {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GetDrinksDetail => "get:drinks-detail",
            Self::PostDrinks => "post:drinks",
            Self::PatchDrinks => "patch:drinks",
            Self::DeleteDrinks => "delete:drinks",
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
