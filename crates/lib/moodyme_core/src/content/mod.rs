//! Content store over the fixed set of well-known content documents.
//!
//! Every [`ContentType`] owns exactly one document in the `content`
//! collection, named by [`ContentType::doc_name`]. Records are only ever
//! seeded ([`seed`]), updated or deactivated; creation through the store is
//! rejected and nothing is ever removed.

pub mod seed;

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use futures::future::try_join_all;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::documents::{DocumentError, DocumentStore, Fields, collections};
use crate::models::content::{Content, ContentType, ContentUpdate, NewContent};
use crate::validation;

/// Content store errors.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content not found")]
    NotFound,

    #[error(
        "Cannot create new content documents. Only predefined content types can be updated."
    )]
    UnsupportedOperation,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] DocumentError),
}

/// Read/update access to the content documents.
#[derive(Clone, Copy)]
pub struct ContentStore<'a> {
    documents: &'a dyn DocumentStore,
}

impl<'a> ContentStore<'a> {
    pub fn new(documents: &'a dyn DocumentStore) -> Self {
        Self { documents }
    }

    /// Every seeded record, newest first.
    pub async fn get_all(&self) -> Result<Vec<Content>, ContentError> {
        let found = try_join_all(ContentType::ALL.iter().map(|kind| self.get_by_type(*kind))).await?;
        let mut contents: Vec<Content> = found.into_iter().flatten().collect();
        contents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(contents)
    }

    pub async fn get_by_type(&self, kind: ContentType) -> Result<Option<Content>, ContentError> {
        let Some(doc) = self
            .documents
            .get(collections::CONTENT, kind.doc_name())
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(doc.decode::<Content>()?))
    }

    /// Look up by document name. Names outside the fixed set are rejected.
    pub async fn get_by_doc_name(&self, doc_name: &str) -> Result<Option<Content>, ContentError> {
        self.get_by_type(resolve_doc_name(doc_name)?).await
    }

    /// Look up by internal id.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Content>, ContentError> {
        Ok(self.locate(id).await?.map(|(_, content)| content))
    }

    /// Always fails: the content set is closed.
    pub async fn create(&self, request: &NewContent) -> Result<Content, ContentError> {
        info!(content_type = %request.content_type, "rejected content creation");
        Err(ContentError::UnsupportedOperation)
    }

    pub async fn update_by_id(
        &self,
        id: &str,
        update: &ContentUpdate,
    ) -> Result<Content, ContentError> {
        check(update)?;
        let (kind, current) = self.locate(id).await?.ok_or(ContentError::NotFound)?;
        self.apply(kind, current, update).await
    }

    pub async fn update_by_doc_name(
        &self,
        doc_name: &str,
        update: &ContentUpdate,
    ) -> Result<Content, ContentError> {
        let kind = resolve_doc_name(doc_name)?;
        check(update)?;
        let current = self
            .get_by_type(kind)
            .await?
            .ok_or(ContentError::NotFound)?;
        self.apply(kind, current, update).await
    }

    /// Soft delete. Deactivating an inactive record succeeds.
    pub async fn deactivate(&self, id: &str) -> Result<Content, ContentError> {
        self.update_by_id(id, &ContentUpdate::deactivate()).await
    }

    /// Scan the fixed documents in table order for an internal id.
    async fn locate(&self, id: &str) -> Result<Option<(ContentType, Content)>, ContentError> {
        for kind in ContentType::ALL {
            if let Some(content) = self.get_by_type(kind).await?
                && content.id == id
            {
                return Ok(Some((kind, content)));
            }
        }
        Ok(None)
    }

    async fn apply(
        &self,
        kind: ContentType,
        mut content: Content,
        update: &ContentUpdate,
    ) -> Result<Content, ContentError> {
        let mut fields = Fields::new();
        if let Some(title) = &update.title {
            content.title = title.clone();
            fields.insert("title".into(), Value::String(content.title.clone()));
        }
        if let Some(body) = &update.content {
            content.content = body.clone();
            fields.insert("content".into(), Value::String(content.content.clone()));
        }
        if let Some(is_active) = update.is_active {
            content.is_active = is_active;
            fields.insert("isActive".into(), Value::Bool(is_active));
        }
        content.updated_at = next_updated_at(content.updated_at, Utc::now());
        fields.insert(
            "updatedAt".into(),
            Value::String(content.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );

        match self
            .documents
            .update(collections::CONTENT, kind.doc_name(), fields)
            .await
        {
            Ok(()) => {}
            Err(DocumentError::NotFound { .. }) => return Err(ContentError::NotFound),
            Err(e) => return Err(e.into()),
        }

        info!(
            doc_name = kind.doc_name(),
            id = %content.id,
            is_active = content.is_active,
            "content updated"
        );
        Ok(content)
    }
}

fn resolve_doc_name(doc_name: &str) -> Result<ContentType, ContentError> {
    ContentType::from_doc_name(doc_name)
        .ok_or_else(|| ContentError::Validation(format!("Invalid content type: {doc_name}")))
}

fn check(update: &ContentUpdate) -> Result<(), ContentError> {
    validation::into_result(validation::content_update_errors(update)).map_err(ContentError::Validation)
}

/// Millisecond-precision timestamp strictly after `previous`.
fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let now = now.trunc_subsecs(3);
    if now > previous {
        now
    } else {
        previous.trunc_subsecs(3) + Duration::milliseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::documents::memory::MemoryDocumentStore;

    async fn store_with(docs: &[(&str, &str, &str)]) -> MemoryDocumentStore {
        let store = MemoryDocumentStore::new();
        for (doc_name, id, created_at) in docs {
            let kind = ContentType::from_doc_name(doc_name).unwrap();
            let fields = json!({
                "id": id,
                "type": kind.as_str(),
                "title": kind.label(),
                "content": "Seeded",
                "isActive": true,
                "createdAt": created_at,
                "updatedAt": created_at,
            });
            store
                .insert(
                    collections::CONTENT,
                    doc_name,
                    fields.as_object().cloned().unwrap(),
                )
                .await;
        }
        store
    }

    #[tokio::test]
    async fn get_all_omits_absent_and_sorts_newest_first() {
        let docs = store_with(&[
            ("home_screen", "id-home", "2024-01-01T00:00:00.000Z"),
            ("about_us", "id-about", "2024-03-01T00:00:00.000Z"),
            ("privacy_policy", "id-privacy", "2024-02-01T00:00:00.000Z"),
        ])
        .await;
        let store = ContentStore::new(&docs);

        let all = store.get_all().await.unwrap();
        let ids: Vec<_> = all.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["id-about", "id-privacy", "id-home"]);
    }

    #[tokio::test]
    async fn create_is_always_rejected() {
        let docs = MemoryDocumentStore::new();
        let store = ContentStore::new(&docs);
        let request = NewContent {
            content_type: ContentType::HomeScreen,
            title: "Another".into(),
            content: "Body".into(),
            is_active: Some(true),
        };
        assert!(matches!(
            store.create(&request).await,
            Err(ContentError::UnsupportedOperation)
        ));
        assert!(docs.list(collections::CONTENT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_by_doc_name_merges_and_advances_timestamp() {
        let docs = store_with(&[("home_screen", "id-home", "2024-01-01T00:00:00.000Z")]).await;
        let store = ContentStore::new(&docs);
        let before = store.get_by_doc_name("home_screen").await.unwrap().unwrap();

        store
            .update_by_doc_name(
                "home_screen",
                &ContentUpdate {
                    content: Some("X".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let after = store.get_by_doc_name("home_screen").await.unwrap().unwrap();
        assert_eq!(after.content, "X");
        assert_eq!(after.title, before.title);
        assert!(after.is_active);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn fields_are_stored_as_submitted() {
        let docs = store_with(&[("home_screen", "id-home", "2024-01-01T00:00:00.000Z")]).await;
        let store = ContentStore::new(&docs);

        store
            .update_by_id(
                "id-home",
                &ContentUpdate {
                    title: Some("  Welcome  ".into()),
                    content: Some("  Hello\n".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = store.get_by_doc_name("home_screen").await.unwrap().unwrap();
        assert_eq!(stored.title, "  Welcome  ");
        assert_eq!(stored.content, "  Hello\n");
    }

    #[tokio::test]
    async fn deactivate_is_idempotent() {
        let docs = store_with(&[("about_us", "id-about", "2024-01-01T00:00:00.000Z")]).await;
        let store = ContentStore::new(&docs);

        let first = store.deactivate("id-about").await.unwrap();
        let second = store.deactivate("id-about").await.unwrap();
        assert!(!first.is_active);
        assert!(!second.is_active);
        assert!(second.updated_at > first.updated_at);
        assert!(docs.get(collections::CONTENT, "about_us").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_records_and_unknown_names() {
        let docs = store_with(&[("about_us", "id-about", "2024-01-01T00:00:00.000Z")]).await;
        let store = ContentStore::new(&docs);

        assert!(matches!(
            store.deactivate("no-such-id").await,
            Err(ContentError::NotFound)
        ));
        assert!(matches!(
            store
                .update_by_doc_name("help_support", &ContentUpdate::deactivate())
                .await,
            Err(ContentError::NotFound)
        ));
        assert!(matches!(
            store.get_by_doc_name("words_of_wisdom").await,
            Err(ContentError::Validation(_))
        ));
        assert!(store.get_by_id("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_title_is_rejected_before_lookup() {
        let docs = MemoryDocumentStore::new();
        let store = ContentStore::new(&docs);
        let update = ContentUpdate {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_by_id("anything", &update).await,
            Err(ContentError::Validation(_))
        ));
    }

    #[test]
    fn timestamps_always_move_forward() {
        let previous = "2030-01-01T00:00:00.500Z".parse::<DateTime<Utc>>().unwrap();
        let earlier = "2029-12-31T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            next_updated_at(previous, earlier),
            previous + Duration::milliseconds(1)
        );

        let later = "2030-01-02T00:00:00.123456Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(next_updated_at(previous, later), later.trunc_subsecs(3));
    }
}
