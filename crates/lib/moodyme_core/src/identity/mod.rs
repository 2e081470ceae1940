//! Identity provider seam.
//!
//! Accounts (email, password, disabled flag, role and name claims) live in an
//! external identity provider. [`IdentityProvider`] is the narrow interface
//! this service needs; [`firebase`] talks to the hosted provider and
//! [`memory`] backs tests and local development.

pub mod admin;
pub mod firebase;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::firebase::{ConfigError, TokenError};
use crate::models::user::{CustomClaims, Identity, NewUser, UserPage, VerifiedToken};

/// Largest page the provider returns from one listing call.
pub const MAX_LIST_PAGE: usize = 1000;

/// Identity provider errors.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("An account with this email already exists")]
    EmailExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("User account is disabled")]
    UserDisabled,

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Identity provider not configured: {0}")]
    Config(String),
}

impl From<TokenError> for IdentityError {
    fn from(e: TokenError) -> Self {
        IdentityError::Provider(e.to_string())
    }
}

impl From<ConfigError> for IdentityError {
    fn from(e: ConfigError) -> Self {
        IdentityError::Config(e.to_string())
    }
}

/// Operations on provider accounts.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and attach its claim set.
    async fn create_user(&self, user: &NewUser) -> Result<Identity, IdentityError>;

    /// Look up by uid; `Ok(None)` when absent.
    async fn get_by_id(&self, uid: &str) -> Result<Option<Identity>, IdentityError>;

    /// Look up by email (case-insensitive); `Ok(None)` when absent.
    async fn get_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError>;

    /// Verify a provider-issued ID token.
    async fn verify_token(&self, id_token: &str) -> Result<VerifiedToken, IdentityError>;

    /// Check an email/password pair, returning the account uid.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityError>;

    /// Enable (`active = true`) or disable an account.
    async fn set_status(&self, uid: &str, active: bool) -> Result<(), IdentityError>;

    /// Replace the full custom-claim set of an account.
    async fn set_claims(&self, uid: &str, claims: &CustomClaims) -> Result<(), IdentityError>;

    async fn delete_user(&self, uid: &str) -> Result<(), IdentityError>;

    /// One page of at most `max_results` accounts (see [`page_limit`]).
    async fn list_users(
        &self,
        max_results: usize,
        page_token: Option<&str>,
    ) -> Result<UserPage, IdentityError>;
}

/// Clamp a requested page size to `1..=MAX_LIST_PAGE`.
pub fn page_limit(max_results: usize) -> usize {
    max_results.clamp(1, MAX_LIST_PAGE)
}

/// Every account, following page tokens to the end.
pub async fn list_all_users(
    provider: &dyn IdentityProvider,
) -> Result<Vec<Identity>, IdentityError> {
    collect_pages(provider, MAX_LIST_PAGE).await
}

async fn collect_pages(
    provider: &dyn IdentityProvider,
    page_size: usize,
) -> Result<Vec<Identity>, IdentityError> {
    let mut users = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = provider.list_users(page_size, page_token.as_deref()).await?;
        users.extend(page.users);
        match page.page_token {
            Some(next) if !next.is_empty() => page_token = Some(next),
            _ => break,
        }
    }
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryIdentityProvider;
    use super::*;

    #[test]
    fn page_limit_is_clamped() {
        assert_eq!(page_limit(0), 1);
        assert_eq!(page_limit(100), 100);
        assert_eq!(page_limit(5000), MAX_LIST_PAGE);
    }

    #[tokio::test]
    async fn list_all_follows_page_tokens() {
        let provider = MemoryIdentityProvider::new().with_bcrypt_cost(4);
        for i in 0..5 {
            provider
                .create_user(&NewUser {
                    email: format!("user{i}@moodyme.app"),
                    first_name: "Mo".into(),
                    last_name: "Dy".into(),
                    password: "password1".into(),
                    role: None,
                })
                .await
                .unwrap();
        }

        let all = collect_pages(&provider, 2).await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(list_all_users(&provider).await.unwrap(), all);
    }
}
