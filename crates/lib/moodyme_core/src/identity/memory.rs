//! In-process identity provider for tests and local development.
//!
//! Passwords are bcrypt-hashed. ID tokens are HS256 tokens signed with a
//! per-instance random secret (see [`MemoryIdentityProvider::issue_id_token`]).

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::{Map, Value, json};
use tokio::sync::RwLock;

use super::{IdentityError, IdentityProvider, page_limit};
use crate::auth::password::{BCRYPT_COST, hash_password, verify_password};
use crate::ids;
use crate::models::user::{CustomClaims, Identity, NewUser, UserPage, VerifiedToken};

const TOKEN_ISSUER: &str = "moodyme-memory-identity";

#[derive(Debug, Clone)]
struct Account {
    identity: Identity,
    password_hash: String,
}

/// Identity provider holding accounts in memory.
pub struct MemoryIdentityProvider {
    accounts: RwLock<Vec<Account>>,
    token_secret: String,
    bcrypt_cost: u32,
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(Vec::new()),
            token_secret: ids::random_id(48),
            bcrypt_cost: BCRYPT_COST,
        }
    }

    /// Lower the bcrypt cost (tests use the minimum of 4).
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Mint an ID token for `uid`, as a client SDK would after sign-in.
    pub async fn issue_id_token(&self, uid: &str) -> Result<String, IdentityError> {
        let identity = self
            .get_by_id(uid)
            .await?
            .ok_or(IdentityError::UserNotFound)?;
        let now = Utc::now();
        let claims = json!({
            "sub": identity.id,
            "email": identity.email,
            "role": identity.role,
            "iss": TOKEN_ISSUER,
            "iat": now.timestamp(),
            "exp": (now + Duration::hours(1)).timestamp(),
        });
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.token_secret.as_bytes()),
        )
        .map_err(|e| IdentityError::Provider(format!("token encode: {e}")))
    }

    async fn update<F>(&self, uid: &str, apply: F) -> Result<(), IdentityError>
    where
        F: FnOnce(&mut Identity),
    {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.identity.id == uid)
            .ok_or(IdentityError::UserNotFound)?;
        apply(&mut account.identity);
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn create_user(&self, user: &NewUser) -> Result<Identity, IdentityError> {
        let email = normalize_email(&user.email);
        let password_hash = hash_password(&user.password, self.bcrypt_cost)
            .map_err(|e| IdentityError::Provider(e.to_string()))?;

        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.identity.email == email) {
            return Err(IdentityError::EmailExists);
        }

        let identity = Identity::from_parts(
            ids::uid(),
            email,
            false,
            false,
            user.claims(),
            Some(Utc::now()),
        );
        accounts.push(Account {
            identity: identity.clone(),
            password_hash,
        });
        Ok(identity)
    }

    async fn get_by_id(&self, uid: &str) -> Result<Option<Identity>, IdentityError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| a.identity.id == uid)
            .map(|a| a.identity.clone()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError> {
        let email = normalize_email(email);
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| a.identity.email == email)
            .map(|a| a.identity.clone()))
    }

    async fn verify_token(&self, id_token: &str) -> Result<VerifiedToken, IdentityError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        let data = decode::<Map<String, Value>>(
            id_token,
            &DecodingKey::from_secret(self.token_secret.as_bytes()),
            &validation,
        )
        .map_err(|_| IdentityError::InvalidCredential)?;

        let claims = data.claims;
        let uid = claims
            .get("sub")
            .and_then(Value::as_str)
            .ok_or(IdentityError::InvalidCredential)?
            .to_string();
        let email = claims
            .get("email")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(VerifiedToken { uid, email, claims })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityError> {
        let email = normalize_email(email);
        let account = {
            let accounts = self.accounts.read().await;
            accounts
                .iter()
                .find(|a| a.identity.email == email)
                .cloned()
                .ok_or(IdentityError::InvalidCredential)?
        };

        let matches = verify_password(password, &account.password_hash)
            .map_err(|e| IdentityError::Provider(e.to_string()))?;
        if !matches {
            return Err(IdentityError::InvalidCredential);
        }
        if account.identity.disabled() {
            return Err(IdentityError::UserDisabled);
        }
        Ok(account.identity.id)
    }

    async fn set_status(&self, uid: &str, active: bool) -> Result<(), IdentityError> {
        self.update(uid, |identity| identity.is_active = active).await
    }

    async fn set_claims(&self, uid: &str, claims: &CustomClaims) -> Result<(), IdentityError> {
        self.update(uid, |identity| {
            identity.role = claims.role;
            identity.first_name = claims.first_name.clone();
            identity.last_name = claims.last_name.clone();
        })
        .await
    }

    async fn delete_user(&self, uid: &str) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|a| a.identity.id != uid);
        if accounts.len() == before {
            return Err(IdentityError::UserNotFound);
        }
        Ok(())
    }

    async fn list_users(
        &self,
        max_results: usize,
        page_token: Option<&str>,
    ) -> Result<UserPage, IdentityError> {
        let offset = match page_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| IdentityError::Provider(format!("invalid page token: {token}")))?,
            None => 0,
        };

        let accounts = self.accounts.read().await;
        let users: Vec<Identity> = accounts
            .iter()
            .skip(offset)
            .take(page_limit(max_results))
            .map(|a| a.identity.clone())
            .collect();
        let next = offset + users.len();
        let page_token = (next < accounts.len()).then(|| next.to_string());
        Ok(UserPage { users, page_token })
    }
}
