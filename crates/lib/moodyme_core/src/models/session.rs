//! Session credential payload.

use serde::{Deserialize, Serialize};

use super::user::{Identity, Role};

/// Claims embedded in an admin session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for `identity`, valid from `iat` until `exp`.
    pub fn for_identity(identity: &Identity, iat: i64, exp: i64) -> Self {
        Self {
            user_id: identity.id.clone(),
            email: identity.email.clone(),
            role: identity.role,
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            iat,
            exp,
        }
    }
}
