//! Document store seam.
//!
//! Content records and user profiles are schemaless documents keyed by
//! collection and id. [`DocumentStore`] exposes the handful of operations
//! this service performs; [`firestore`] is the hosted backend and [`memory`]
//! the in-process one.

pub mod firestore;
pub mod memory;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::firebase::{ConfigError, TokenError};

/// Document fields as a JSON object.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Well-known collection names.
pub mod collections {
    pub const CONTENT: &str = "content";
    pub const USERS: &str = "users";
}

/// Document store errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Document store error: {0}")]
    Backend(String),

    #[error("Document store not configured: {0}")]
    Config(String),
}

impl From<ConfigError> for DocumentError {
    fn from(e: ConfigError) -> Self {
        DocumentError::Config(e.to_string())
    }
}

impl From<TokenError> for DocumentError {
    fn from(e: TokenError) -> Self {
        DocumentError::Backend(e.to_string())
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Deserialize the fields into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DocumentError> {
        serde_json::from_value(serde_json::Value::Object(self.fields.clone()))
            .map_err(|e| DocumentError::Malformed(format!("{}: {e}", self.id)))
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document; `Ok(None)` when absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DocumentError>;

    /// Every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, DocumentError>;

    /// Merge `fields` into an existing document.
    ///
    /// Fails with [`DocumentError::NotFound`] when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), DocumentError>;

    /// Create a document unless one already exists. Returns whether it was created.
    async fn create_if_absent(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<bool, DocumentError>;
}
