//! Appwrite-backed document store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::adapters::appwrite::client::{AppwriteClient, AppwriteError};
use crate::traits::documents::{
    Document, DocumentError, DocumentStore, Filter, Permission, Sort,
};

/// Document object as returned by the databases API.
///
/// Attribute values sit next to the `$`-prefixed metadata in one flat
/// object; `flatten` collects them and the metadata keys are stripped
/// before the document reaches the rest of the crate.
#[derive(Debug, Deserialize)]
struct DocumentResponse {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "$createdAt")]
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<DocumentResponse> for Document {
    fn from(mut doc: DocumentResponse) -> Self {
        doc.fields.retain(|key, _| !key.starts_with('$'));
        Document {
            id: doc.id,
            created_at: doc.created_at,
            fields: Value::Object(doc.fields),
        }
    }
}

/// List response (GET .../documents).
#[derive(Debug, Deserialize)]
struct DocumentListResponse {
    documents: Vec<DocumentResponse>,
}

/// Document store over the Appwrite databases API.
///
/// The database id is fixed per adapter; the `collection` argument of each
/// trait method selects the collection within it.
#[derive(Debug, Clone)]
pub struct AppwriteDocuments {
    client: Arc<AppwriteClient>,
    database_id: String,
}

impl AppwriteDocuments {
    /// Create a store over the shared client and database.
    pub fn new(client: Arc<AppwriteClient>, database_id: impl Into<String>) -> Self {
        Self {
            client,
            database_id: database_id.into(),
        }
    }

    fn documents_path(&self, collection: &str) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id, collection
        )
    }

    fn document_path(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.documents_path(collection), id)
    }

    /// Encode filters and sorts as `queries[]` parameters.
    fn queries_suffix(filters: &[Filter], sort: &[Sort]) -> String {
        let mut queries = Vec::new();
        for filter in filters {
            match filter {
                Filter::Equal { attribute, value } => queries.push(json!({
                    "method": "equal",
                    "attribute": attribute,
                    "values": [value],
                })),
            }
        }
        for order in sort {
            match order {
                Sort::Asc(attribute) => queries.push(json!({
                    "method": "orderAsc",
                    "attribute": attribute,
                })),
                Sort::Desc(attribute) => queries.push(json!({
                    "method": "orderDesc",
                    "attribute": attribute,
                })),
            }
        }
        queries
            .iter()
            .map(|q| format!("queries[]={}", urlencoding::encode(&q.to_string())))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn convert_error(e: AppwriteError) -> DocumentError {
        match e {
            AppwriteError::Api {
                status, message, ..
            } => DocumentError::Rejected { status, message },
            AppwriteError::Http(e) if e.is_connect() || e.is_timeout() => {
                DocumentError::Connection(e.to_string())
            }
            AppwriteError::Http(e) => DocumentError::Other(e.to_string()),
            AppwriteError::Json(e) => DocumentError::InvalidResponse(e.to_string()),
        }
    }
}

#[async_trait]
impl DocumentStore for AppwriteDocuments {
    async fn create_document(
        &self,
        collection: &str,
        fields: Value,
        permissions: &[Permission],
    ) -> Result<Document, DocumentError> {
        let permissions: Vec<String> = permissions.iter().map(Permission::to_string).collect();
        let body = json!({
            "documentId": "unique()",
            "data": fields,
            "permissions": permissions,
        });
        let builder = self
            .client
            .request(Method::POST, &self.documents_path(collection))
            .json(&body);
        let doc: DocumentResponse = self
            .client
            .send_json(builder)
            .await
            .map_err(Self::convert_error)?;
        Ok(doc.into())
    }

    async fn list_documents(
        &self,
        collection: &str,
        filters: &[Filter],
        sort: &[Sort],
    ) -> Result<Vec<Document>, DocumentError> {
        let mut path = self.documents_path(collection);
        let suffix = Self::queries_suffix(filters, sort);
        if !suffix.is_empty() {
            path = format!("{}?{}", path, suffix);
        }
        let builder = self.client.request(Method::GET, &path);
        let list: DocumentListResponse = self
            .client
            .send_json(builder)
            .await
            .map_err(Self::convert_error)?;
        Ok(list.documents.into_iter().map(Document::from).collect())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Value,
    ) -> Result<Document, DocumentError> {
        let body = json!({ "data": fields });
        let builder = self
            .client
            .request(Method::PATCH, &self.document_path(collection, id))
            .json(&body);
        let doc: DocumentResponse = self
            .client
            .send_json(builder)
            .await
            .map_err(Self::convert_error)?;
        Ok(doc.into())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), DocumentError> {
        let builder = self
            .client
            .request(Method::DELETE, &self.document_path(collection, id));
        self.client
            .send_empty(builder)
            .await
            .map_err(Self::convert_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_suffix_encodes_filter_and_order() {
        let suffix = AppwriteDocuments::queries_suffix(
            &[Filter::equal("userId", "u1")],
            &[Sort::newest_first()],
        );
        let decoded = urlencoding::decode(&suffix).unwrap();
        assert!(decoded.contains(r#""method":"equal""#));
        assert!(decoded.contains(r#""attribute":"userId""#));
        assert!(decoded.contains(r#""method":"orderDesc""#));
        assert!(decoded.contains("$createdAt"));
        assert_eq!(suffix.matches("queries[]=").count(), 2);
    }

    #[test]
    fn test_queries_suffix_empty_when_unfiltered() {
        assert_eq!(AppwriteDocuments::queries_suffix(&[], &[]), "");
    }

    #[test]
    fn test_document_response_strips_metadata_keys() {
        let raw = r#"{
            "$id": "c1",
            "$createdAt": "2025-01-01T00:00:00.000+00:00",
            "$updatedAt": "2025-01-02T00:00:00.000+00:00",
            "$permissions": [],
            "name": "Bob",
            "userId": "u1"
        }"#;
        let doc: Document = serde_json::from_str::<DocumentResponse>(raw).unwrap().into();
        assert_eq!(doc.id, "c1");
        assert_eq!(doc.fields["name"], "Bob");
        assert_eq!(doc.fields["userId"], "u1");
        assert!(doc.fields.get("$updatedAt").is_none());
        assert!(doc.fields.get("$permissions").is_none());
    }
}
