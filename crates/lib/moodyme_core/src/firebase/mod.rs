//! Hosted backend connection settings and service-account auth.
//!
//! Both the identity adapter and the document-store adapter talk to the
//! hosted backend over REST with a service-account access token.

pub mod token;

use std::fmt;

use thiserror::Error;
use tracing::debug;
use url::Url;

pub use token::AccessTokenSource;

/// Default REST base for the identity admin API.
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
/// Default REST base for the document database API.
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
/// OAuth token endpoint for service-account assertions.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// Public keys that sign provider ID tokens.
pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid value for environment variable {name}: {reason}")]
    InvalidEnvVar { name: &'static str, reason: String },
}

/// Service-account access-token errors.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid service account key: {0}")]
    InvalidKey(String),

    #[error("Token request failed: {0}")]
    Request(String),
}

/// Connection settings for the hosted backend.
#[derive(Clone)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub client_email: String,
    /// PEM-encoded RSA key of the service account.
    pub private_key: String,
    /// Web API key, used for password sign-in.
    pub api_key: Option<String>,
    pub identity_base_url: String,
    pub firestore_base_url: String,
    pub token_uri: String,
    pub jwks_url: String,
}

impl fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("identity_base_url", &self.identity_base_url)
            .field("firestore_base_url", &self.firestore_base_url)
            .finish()
    }
}

impl FirebaseConfig {
    /// Load settings from the environment.
    ///
    /// `FIREBASE_PRIVATE_KEY` may carry literal `\n` sequences (as stored in
    /// dotenv files); these are expanded to newlines.
    pub fn from_env() -> Result<Self, ConfigError> {
        debug!("reading Firebase settings from the environment");
        let project_id = required("FIREBASE_PROJECT_ID")?;
        let client_email = required("FIREBASE_CLIENT_EMAIL")?;
        let private_key = required("FIREBASE_PRIVATE_KEY")?.replace("\\n", "\n");
        if !private_key.contains("PRIVATE KEY") {
            return Err(ConfigError::InvalidEnvVar {
                name: "FIREBASE_PRIVATE_KEY",
                reason: "expected a PEM-encoded private key".into(),
            });
        }

        Ok(Self {
            project_id,
            client_email,
            private_key,
            api_key: optional("FIREBASE_API_KEY"),
            identity_base_url: base_url("FIREBASE_IDENTITY_BASE_URL", DEFAULT_IDENTITY_BASE_URL)?,
            firestore_base_url: base_url(
                "FIREBASE_FIRESTORE_BASE_URL",
                DEFAULT_FIRESTORE_BASE_URL,
            )?,
            token_uri: base_url("FIREBASE_TOKEN_URI", DEFAULT_TOKEN_URI)?,
            jwks_url: DEFAULT_JWKS_URL.to_string(),
        })
    }

    /// Expected issuer of provider ID tokens for this project.
    pub fn token_issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingEnvVar(name))
}

fn base_url(name: &'static str, default: &str) -> Result<String, ConfigError> {
    let value = optional(name).unwrap_or_else(|| default.to_string());
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar {
        name,
        reason: e.to_string(),
    })?;
    Ok(value.trim_end_matches('/').to_string())
}
