//! Service-account access tokens (OAuth 2.0 JWT bearer grant).

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use super::{FirebaseConfig, TokenError};

const SCOPES: &str = "https://www.googleapis.com/auth/cloud-platform \
https://www.googleapis.com/auth/datastore \
https://www.googleapis.com/auth/identitytoolkit \
https://www.googleapis.com/auth/userinfo.email";

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Refresh this long before the cached token expires.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Serialize)]
struct Assertion<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Mints and caches bearer tokens for the service account.
pub struct AccessTokenSource {
    client: reqwest::Client,
    client_email: String,
    token_uri: String,
    key: EncodingKey,
    cached: RwLock<Option<CachedToken>>,
}

impl fmt::Debug for AccessTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenSource")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl AccessTokenSource {
    pub fn new(client: reqwest::Client, config: &FirebaseConfig) -> Result<Self, TokenError> {
        let key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        Ok(Self {
            client,
            client_email: config.client_email.clone(),
            token_uri: config.token_uri.clone(),
            key,
            cached: RwLock::new(None),
        })
    }

    /// A valid bearer token, minting a new one when the cache is stale.
    pub async fn token(&self) -> Result<String, TokenError> {
        let now = Utc::now();
        if let Some(token) = fresh(&*self.cached.read().await, now) {
            return Ok(token);
        }

        let mut guard = self.cached.write().await;
        if let Some(token) = fresh(&guard, now) {
            return Ok(token);
        }

        let minted = self.mint(now).await?;
        let value = minted.value.clone();
        *guard = Some(minted);
        Ok(value)
    }

    async fn mint(&self, now: DateTime<Utc>) -> Result<CachedToken, TokenError> {
        let assertion = Assertion {
            iss: &self.client_email,
            scope: SCOPES,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let jwt = encode(&Header::new(Algorithm::RS256), &assertion, &self.key)
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;

        let params = [("grant_type", GRANT_TYPE), ("assertion", jwt.as_str())];
        let resp = self
            .client
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| TokenError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TokenError::Request(format!("HTTP {status}: {body}")));
        }

        let body = resp
            .json::<TokenResponse>()
            .await
            .map_err(|e| TokenError::Request(format!("token response parse error: {e}")))?;

        debug!(expires_in = body.expires_in, "minted service account token");
        Ok(CachedToken {
            value: body.access_token,
            expires_at: now + Duration::seconds(body.expires_in),
        })
    }
}

fn fresh(cached: &Option<CachedToken>, now: DateTime<Utc>) -> Option<String> {
    cached
        .as_ref()
        .filter(|t| t.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now)
        .map(|t| t.value.clone())
}
