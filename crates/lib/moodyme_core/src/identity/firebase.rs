//! Hosted identity provider over its REST admin API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{IdentityError, IdentityProvider, page_limit};
use crate::firebase::{AccessTokenSource, FirebaseConfig};
use crate::models::user::{CustomClaims, Identity, NewUser, UserPage, VerifiedToken};

/// How long fetched signing keys are trusted before refetching.
const JWKS_TTL: Duration = Duration::from_secs(60 * 60);

/// Account record as returned by the admin API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderAccount {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    email_verified: bool,
    #[serde(default)]
    disabled: bool,
    /// JSON-encoded custom claims.
    #[serde(default)]
    custom_attributes: Option<String>,
    /// Milliseconds since the epoch, as a string.
    #[serde(default)]
    created_at: Option<String>,
}

impl ProviderAccount {
    fn into_identity(self) -> Identity {
        let claims = self
            .custom_attributes
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| match serde_json::from_str::<CustomClaims>(raw) {
                Ok(claims) => Some(claims),
                Err(e) => {
                    warn!(uid = %self.local_id, error = %e, "unreadable custom claims");
                    None
                }
            })
            .unwrap_or_default();

        let created_at = self
            .created_at
            .as_deref()
            .and_then(|ms| ms.parse::<i64>().ok())
            .and_then(DateTime::<Utc>::from_timestamp_millis);

        Identity::from_parts(
            self.local_id,
            self.email,
            self.disabled,
            self.email_verified,
            claims,
            created_at,
        )
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<ProviderAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    users: Vec<ProviderAccount>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalIdResponse {
    local_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Map a provider error code (e.g. `EMAIL_EXISTS : details`) to an error.
fn classify(message: &str) -> IdentityError {
    let code = message.split([' ', ':']).next().unwrap_or_default();
    match code {
        "EMAIL_EXISTS" | "DUPLICATE_EMAIL" => IdentityError::EmailExists,
        "USER_NOT_FOUND" => IdentityError::UserNotFound,
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
            IdentityError::InvalidCredential
        }
        "USER_DISABLED" => IdentityError::UserDisabled,
        _ => IdentityError::Provider(message.to_string()),
    }
}

/// Identity provider backed by the hosted admin REST API.
pub struct FirebaseIdentityProvider {
    client: reqwest::Client,
    config: FirebaseConfig,
    tokens: AccessTokenSource,
    keys: RwLock<Option<CachedKeys>>,
}

impl FirebaseIdentityProvider {
    pub fn new(client: reqwest::Client, config: FirebaseConfig) -> Result<Self, IdentityError> {
        let tokens = AccessTokenSource::new(client.clone(), &config)?;
        Ok(Self {
            client,
            config,
            tokens,
            keys: RwLock::new(None),
        })
    }

    fn admin_url(&self, action: &str) -> String {
        format!(
            "{}/projects/{}/{}",
            self.config.identity_base_url, self.config.project_id, action
        )
    }

    /// POST an admin call with the service-account token.
    async fn admin_post<T: DeserializeOwned>(
        &self,
        action: &str,
        body: &Value,
    ) -> Result<T, IdentityError> {
        let token = self.tokens.token().await?;
        let resp = self
            .client
            .post(self.admin_url(action))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityError::Provider(format!("{action}: {e}")))?;
        read_response(action, resp).await
    }

    async fn lookup(&self, body: Value) -> Result<Option<Identity>, IdentityError> {
        let found: LookupResponse = self.admin_post("accounts:lookup", &body).await?;
        Ok(found
            .users
            .into_iter()
            .next()
            .map(ProviderAccount::into_identity))
    }

    async fn signing_keys(&self, force: bool) -> Result<JwkSet, IdentityError> {
        if !force
            && let Some(cached) = self.keys.read().await.as_ref()
            && cached.fetched_at.elapsed() < JWKS_TTL
        {
            return Ok(cached.keys.clone());
        }

        let resp = self
            .client
            .get(&self.config.jwks_url)
            .send()
            .await
            .map_err(|e| IdentityError::Provider(format!("jwks: {e}")))?;
        let keys: JwkSet = read_response("jwks", resp).await?;
        debug!(count = keys.keys.len(), "refreshed token signing keys");

        *self.keys.write().await = Some(CachedKeys {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }
}

async fn read_response<T: DeserializeOwned>(
    action: &str,
    resp: reqwest::Response,
) -> Result<T, IdentityError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => classify(&envelope.error.message),
            Err(_) => IdentityError::Provider(format!("{action}: HTTP {status}: {body}")),
        });
    }
    resp.json::<T>()
        .await
        .map_err(|e| IdentityError::Provider(format!("{action}: response parse error: {e}")))
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn create_user(&self, user: &NewUser) -> Result<Identity, IdentityError> {
        let display_name = format!("{} {}", user.first_name.trim(), user.last_name.trim());
        let created: LocalIdResponse = self
            .admin_post(
                "accounts",
                &json!({
                    "email": user.email.trim(),
                    "password": user.password,
                    "displayName": display_name.trim(),
                    "emailVerified": false,
                    "disabled": false,
                }),
            )
            .await?;

        self.set_claims(&created.local_id, &user.claims()).await?;
        self.get_by_id(&created.local_id)
            .await?
            .ok_or(IdentityError::UserNotFound)
    }

    async fn get_by_id(&self, uid: &str) -> Result<Option<Identity>, IdentityError> {
        self.lookup(json!({ "localId": [uid] })).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError> {
        self.lookup(json!({ "email": [email.trim()] })).await
    }

    async fn verify_token(&self, id_token: &str) -> Result<VerifiedToken, IdentityError> {
        let header = decode_header(id_token).map_err(|_| IdentityError::InvalidCredential)?;
        let kid = header.kid.ok_or(IdentityError::InvalidCredential)?;

        let mut keys = self.signing_keys(false).await?;
        if keys.find(&kid).is_none() {
            keys = self.signing_keys(true).await?;
        }
        let jwk = keys.find(&kid).ok_or(IdentityError::InvalidCredential)?;
        let key = DecodingKey::from_jwk(jwk)
            .map_err(|e| IdentityError::Provider(format!("jwk: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.config.project_id.as_str()]);
        validation.set_issuer(&[self.config.token_issuer()]);

        let data = decode::<Map<String, Value>>(id_token, &key, &validation).map_err(|e| {
            debug!(error = %e, "id token rejected");
            IdentityError::InvalidCredential
        })?;

        let claims = data.claims;
        let uid = claims
            .get("sub")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
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
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| IdentityError::Config("FIREBASE_API_KEY is not set".into()))?;

        let resp = self
            .client
            .post(format!(
                "{}/accounts:signInWithPassword",
                self.config.identity_base_url
            ))
            .query(&[("key", api_key)])
            .json(&json!({
                "email": email.trim(),
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(|e| IdentityError::Provider(format!("signInWithPassword: {e}")))?;
        let signed_in: LocalIdResponse = read_response("signInWithPassword", resp).await?;
        Ok(signed_in.local_id)
    }

    async fn set_status(&self, uid: &str, active: bool) -> Result<(), IdentityError> {
        let _: Value = self
            .admin_post(
                "accounts:update",
                &json!({ "localId": uid, "disableUser": !active }),
            )
            .await?;
        Ok(())
    }

    async fn set_claims(&self, uid: &str, claims: &CustomClaims) -> Result<(), IdentityError> {
        let encoded = serde_json::to_string(claims)
            .map_err(|e| IdentityError::Provider(format!("claims encode: {e}")))?;
        let _: Value = self
            .admin_post(
                "accounts:update",
                &json!({ "localId": uid, "customAttributes": encoded }),
            )
            .await?;
        Ok(())
    }

    async fn delete_user(&self, uid: &str) -> Result<(), IdentityError> {
        let _: Value = self
            .admin_post("accounts:delete", &json!({ "localId": uid }))
            .await?;
        Ok(())
    }

    async fn list_users(
        &self,
        max_results: usize,
        page_token: Option<&str>,
    ) -> Result<UserPage, IdentityError> {
        let token = self.tokens.token().await?;
        let max_results = page_limit(max_results).to_string();
        let mut query = vec![("maxResults", max_results.as_str())];
        if let Some(page_token) = page_token {
            query.push(("nextPageToken", page_token));
        }

        let resp = self
            .client
            .get(self.admin_url("accounts:batchGet"))
            .bearer_auth(token)
            .query(&query)
            .send()
            .await
            .map_err(|e| IdentityError::Provider(format!("accounts:batchGet: {e}")))?;
        let page: BatchGetResponse = read_response("accounts:batchGet", resp).await?;

        Ok(UserPage {
            users: page
                .users
                .into_iter()
                .map(ProviderAccount::into_identity)
                .collect(),
            page_token: page.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}
