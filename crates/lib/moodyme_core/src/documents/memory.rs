//! In-process document store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Document, DocumentError, DocumentStore, Fields};

/// Documents held in memory, ordered by id within each collection.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Fields>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a document.
    pub async fn insert(&self, collection: &str, id: &str, fields: Fields) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    pub async fn remove(&self, collection: &str, id: &str) -> Option<Fields> {
        self.collections
            .write()
            .await
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DocumentError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, DocumentError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), DocumentError> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| DocumentError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        existing.extend(fields);
        Ok(())
    }

    async fn create_if_absent(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<bool, DocumentError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(id) {
            return Ok(false);
        }
        docs.insert(id.to_string(), fields);
        Ok(true)
    }
}
