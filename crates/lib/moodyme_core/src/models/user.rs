//! User domain models.
//!
//! Identity records come from the identity provider (role and names live in
//! custom claims). Profiles come from the `users` document collection written
//! by the mobile app. [`CombinedUser`] is the joined, read-only view.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Account role, stored as a provider-side custom claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// Read a role claim. Absent or unrecognised values fall back to `USER`.
    pub fn from_claim(value: Option<&str>) -> Self {
        match value {
            Some("ADMIN") => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(Role::from_claim(value.as_ref().and_then(|v| v.as_str())))
}

/// The complete custom-claim set this service writes for an account.
///
/// Writes to the provider replace the whole set, so partial changes go
/// through [`CustomClaims::merged`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomClaims {
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Role,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Partial name change for an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimsUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl CustomClaims {
    /// Apply a name update on top of these claims.
    ///
    /// The role is always carried over. A name is replaced only by a
    /// non-empty value; empty or missing values keep the current one.
    pub fn merged(&self, update: &ClaimsUpdate) -> Self {
        fn pick(current: &str, new: Option<&String>) -> String {
            match new.map(|v| v.trim()) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => current.to_string(),
            }
        }

        Self {
            role: self.role,
            first_name: pick(&self.first_name, update.first_name.as_ref()),
            last_name: pick(&self.last_name, update.last_name.as_ref()),
        }
    }

    /// Same claims with a different role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// An account as seen through the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Negation of the provider's `disabled` flag.
    pub is_active: bool,
    pub email_verified: bool,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Build an identity from provider fields and its claim set.
    pub fn from_parts(
        id: String,
        email: String,
        disabled: bool,
        email_verified: bool,
        claims: CustomClaims,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            email,
            first_name: claims.first_name,
            last_name: claims.last_name,
            is_active: !disabled,
            email_verified,
            role: claims.role,
            created_at,
        }
    }

    pub fn disabled(&self) -> bool {
        !self.is_active
    }

    /// The claim set currently carried by this account.
    pub fn claims(&self) -> CustomClaims {
        CustomClaims {
            role: self.role,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Input for creating an account.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    /// Defaults to [`Role::User`].
    pub role: Option<Role>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

impl NewUser {
    pub fn claims(&self) -> CustomClaims {
        CustomClaims {
            role: self.role.unwrap_or_default(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        }
    }
}

/// Claims extracted from a verified provider ID token.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    pub uid: String,
    pub email: Option<String>,
    pub claims: serde_json::Map<String, serde_json::Value>,
}

/// One page of accounts from the provider.
#[derive(Debug, Clone, Default)]
pub struct UserPage {
    pub users: Vec<Identity>,
    /// Opaque provider token for the next page; `None` on the last page.
    pub page_token: Option<String>,
}

/// Profile document from the `users` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Document id; filled in from the storage key when read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Older profiles predate this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_email_sent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// The uid this profile belongs to: the `uid` field, else the document id.
    pub fn owner(&self) -> &str {
        if self.uid.is_empty() {
            self.id.as_deref().unwrap_or_default()
        } else {
            &self.uid
        }
    }
}

/// Identity record joined with its profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedUser {
    pub uid: String,
    pub email: String,
    pub disabled: bool,
    pub email_verified: bool,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub profile_created_at: Option<String>,
    pub allow_email_sent: bool,
    pub is_active: bool,
    pub full_name: String,
    pub auth_data: Identity,
    pub profile_data: Option<UserProfile>,
}
