//! Hosted document database over its REST API.
//!
//! The REST API wraps every field in a typed value (`{"stringValue": ..}`);
//! [`encode_value`] and [`decode_value`] translate to and from plain JSON.
//! Timestamps decode to their RFC 3339 string.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Number, Value, json};
use tracing::{debug, warn};

use super::{Document, DocumentError, DocumentStore, Fields};
use crate::firebase::{AccessTokenSource, FirebaseConfig};

/// Page size for collection listing.
const LIST_PAGE_SIZE: &str = "300";

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl RawDocument {
    fn into_document(self) -> Document {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Document::new(id, decode_fields(self.fields))
    }
}

/// Encode a plain JSON value as a typed REST value.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Decode a typed REST value to plain JSON. Unknown kinds decode to `null`.
pub fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };
    match kind.as_str() {
        "stringValue" | "booleanValue" | "timestampValue" | "referenceValue" | "bytesValue"
        | "geoPointValue" => inner.clone(),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(|i| Value::Number(i.into()))
            .unwrap_or_else(|| inner.clone()),
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(decode_fields(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        )),
        _ => Value::Null,
    }
}

fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

fn decode_fields(fields: Map<String, Value>) -> Fields {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

/// Quote a field name for use in an update mask.
pub fn field_path(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

/// Document store backed by the hosted REST API.
pub struct FirestoreDocumentStore {
    client: reqwest::Client,
    documents_url: String,
    tokens: AccessTokenSource,
}

impl FirestoreDocumentStore {
    pub fn new(client: reqwest::Client, config: &FirebaseConfig) -> Result<Self, DocumentError> {
        let tokens = AccessTokenSource::new(client.clone(), config)?;
        Ok(Self {
            client,
            documents_url: format!(
                "{}/projects/{}/databases/(default)/documents",
                config.firestore_base_url, config.project_id
            ),
            tokens,
        })
    }

    fn doc_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_url, collection, id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, DocumentError> {
        let token = self.tokens.token().await?;
        request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DocumentError::Backend(e.to_string()))
    }
}

async fn failure(resp: reqwest::Response) -> DocumentError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    DocumentError::Backend(format!("HTTP {status}: {body}"))
}

async fn parse<T: for<'de> Deserialize<'de>>(resp: reqwest::Response) -> Result<T, DocumentError> {
    resp.json::<T>()
        .await
        .map_err(|e| DocumentError::Malformed(e.to_string()))
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DocumentError> {
        let resp = self.send(self.client.get(self.doc_url(collection, id))).await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(parse::<RawDocument>(resp).await?.into_document())),
            _ => Err(failure(resp).await),
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, DocumentError> {
        let url = format!("{}/{}", self.documents_url, collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", LIST_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }
            let resp = self.send(self.client.get(&url).query(&query)).await?;
            if !resp.status().is_success() {
                return Err(failure(resp).await);
            }
            let page: ListResponse = parse(resp).await?;
            documents.extend(page.documents.into_iter().map(RawDocument::into_document));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        debug!(collection, count = documents.len(), "listed documents");
        Ok(documents)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), DocumentError> {
        let mut query: Vec<(&str, String)> = vec![("currentDocument.exists", "true".into())];
        query.extend(
            fields
                .keys()
                .map(|k| ("updateMask.fieldPaths", field_path(k))),
        );

        let resp = self
            .send(
                self.client
                    .patch(self.doc_url(collection, id))
                    .query(&query)
                    .json(&json!({ "fields": encode_fields(&fields) })),
            )
            .await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Err(DocumentError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
            s if s.is_success() => Ok(()),
            _ => Err(failure(resp).await),
        }
    }

    async fn create_if_absent(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<bool, DocumentError> {
        let resp = self
            .send(
                self.client
                    .post(format!("{}/{}", self.documents_url, collection))
                    .query(&[("documentId", id)])
                    .json(&json!({ "fields": encode_fields(&fields) })),
            )
            .await?;
        match resp.status() {
            StatusCode::CONFLICT => {
                warn!(collection, id, "document already exists");
                Ok(false)
            }
            s if s.is_success() => Ok(true),
            _ => Err(failure(resp).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_values_decode_to_plain_json() {
        let raw = json!({
            "title": { "stringValue": "Welcome" },
            "isActive": { "booleanValue": true },
            "order": { "integerValue": "3" },
            "score": { "doubleValue": 0.5 },
            "createdAt": { "timestampValue": "2024-05-01T10:00:00Z" },
            "tags": { "arrayValue": { "values": [{ "stringValue": "a" }] } },
            "empty": { "arrayValue": {} },
            "meta": { "mapValue": { "fields": { "n": { "nullValue": null } } } }
        });
        let decoded = decode_fields(raw.as_object().cloned().unwrap());

        assert_eq!(
            Value::Object(decoded),
            json!({
                "title": "Welcome",
                "isActive": true,
                "order": 3,
                "score": 0.5,
                "createdAt": "2024-05-01T10:00:00Z",
                "tags": ["a"],
                "empty": [],
                "meta": { "n": null }
            })
        );
    }

    #[test]
    fn plain_json_encodes_to_typed_values() {
        assert_eq!(
            encode_value(&json!({"a": 1, "b": [true, "x"]})),
            json!({ "mapValue": { "fields": {
                "a": { "integerValue": "1" },
                "b": { "arrayValue": { "values": [
                    { "booleanValue": true },
                    { "stringValue": "x" }
                ] } }
            } } })
        );
        assert_eq!(encode_value(&json!(1.5)), json!({ "doubleValue": 1.5 }));
    }

    #[test]
    fn document_id_is_last_path_segment() {
        let raw = RawDocument {
            name: "projects/p/databases/(default)/documents/content/home_screen".into(),
            fields: Map::new(),
        };
        assert_eq!(raw.into_document().id, "home_screen");
    }

    #[test]
    fn field_paths_are_quoted_when_needed() {
        assert_eq!(field_path("isActive"), "isActive");
        assert_eq!(field_path("first-name"), "`first-name`");
        assert_eq!(field_path("9lives"), "`9lives`");
    }
}
