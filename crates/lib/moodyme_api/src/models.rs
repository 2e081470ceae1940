//! Request and response bodies.

use moodyme_core::directory::Page;
use moodyme_core::models::content::Content;
use moodyme_core::models::session::SessionClaims;
use moodyme_core::models::user::{CombinedUser, Identity, Role};
use moodyme_core::stats::{DashboardStats, RecentUser};
use serde::{Deserialize, Serialize};

/// Body of every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
}

/// The signed-in operator as returned to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<&Identity> for SessionUser {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            email: identity.email.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            role: identity.role,
            is_active: None,
        }
    }
}

impl From<&SessionClaims> for SessionUser {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            id: claims.user_id.clone(),
            email: claims.email.clone(),
            first_name: claims.first_name.clone(),
            last_name: claims.last_name.clone(),
            role: claims.role,
            // A session is only ever issued to an active account.
            is_active: Some(true),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub success: bool,
    pub stats: DashboardStats,
    pub recent_users: Vec<RecentUser>,
}

#[derive(Debug, Serialize)]
pub struct ContentCounts {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl ContentCounts {
    pub fn of(contents: &[Content]) -> Self {
        let active = contents.iter().filter(|c| c.is_active).count();
        Self {
            total: contents.len(),
            active,
            inactive: contents.len() - active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContentListResponse {
    pub success: bool,
    pub contents: Vec<Content>,
    pub stats: ContentCounts,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub content: Content,
}

/// Query string for user listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    #[serde(flatten)]
    pub page: Page<CombinedUser>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: CombinedUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}
