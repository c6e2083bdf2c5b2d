//! In-memory document store for testing.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::traits::documents::{
    Document, DocumentError, DocumentStore, Filter, Permission, Sort,
};

/// In-memory document store.
///
/// Documents are grouped by collection; creation times are strictly
/// increasing (a millisecond counter) so order-by-creation queries are
/// deterministic even when a test creates several records back to back.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocuments {
    collections: Arc<Mutex<HashMap<String, Vec<Document>>>>,
    permissions: Arc<Mutex<HashMap<String, Vec<Permission>>>>,
    fail_next: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<u64>>,
    seq: Arc<Mutex<i64>>,
}

impl InMemoryDocuments {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with a connection error.
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    /// How many store operations have been attempted.
    pub fn call_count(&self) -> u64 {
        *self.calls.lock().unwrap()
    }

    /// Permissions recorded for a document on creation.
    pub fn permissions_for(&self, id: &str) -> Option<Vec<Permission>> {
        self.permissions.lock().unwrap().get(id).cloned()
    }

    /// Total documents across all collections.
    pub fn len(&self) -> usize {
        self.collections.lock().unwrap().values().map(Vec::len).sum()
    }

    /// True when no document is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self) -> Result<(), DocumentError> {
        *self.calls.lock().unwrap() += 1;
        match self.fail_next.lock().unwrap().take() {
            Some(message) => Err(DocumentError::Connection(message)),
            None => Ok(()),
        }
    }

    fn matches(doc: &Document, filters: &[Filter]) -> bool {
        filters.iter().all(|filter| match filter {
            Filter::Equal { attribute, value } => doc.fields.get(attribute) == Some(value),
        })
    }

    fn apply_sort(docs: &mut [Document], sort: &[Sort]) {
        // One sort key is all the contact store ever asks for.
        if let Some(order) = sort.first() {
            match order {
                Sort::Asc(attr) if attr == Sort::CREATED_AT => {
                    docs.sort_by_key(|d| d.created_at);
                }
                Sort::Desc(attr) if attr == Sort::CREATED_AT => {
                    docs.sort_by_key(|d| std::cmp::Reverse(d.created_at));
                }
                Sort::Asc(attr) => {
                    docs.sort_by_key(|d| d.fields.get(attr).map(Value::to_string));
                }
                Sort::Desc(attr) => {
                    docs.sort_by_key(|d| {
                        std::cmp::Reverse(d.fields.get(attr).map(Value::to_string))
                    });
                }
            }
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocuments {
    async fn create_document(
        &self,
        collection: &str,
        fields: Value,
        permissions: &[Permission],
    ) -> Result<Document, DocumentError> {
        self.check_failure()?;
        let seq = {
            let mut seq = self.seq.lock().unwrap();
            *seq += 1;
            *seq
        };
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now() + Duration::milliseconds(seq),
            fields,
        };
        self.permissions
            .lock()
            .unwrap()
            .insert(doc.id.clone(), permissions.to_vec());
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn list_documents(
        &self,
        collection: &str,
        filters: &[Filter],
        sort: &[Sort],
    ) -> Result<Vec<Document>, DocumentError> {
        self.check_failure()?;
        let collections = self.collections.lock().unwrap();
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| Self::matches(d, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Self::apply_sort(&mut docs, sort);
        Ok(docs)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Value,
    ) -> Result<Document, DocumentError> {
        self.check_failure()?;
        let mut collections = self.collections.lock().unwrap();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| DocumentError::Rejected {
                status: 404,
                message: "Document with the requested ID could not be found".to_string(),
            })?;
        if let (Some(existing), Some(changes)) = (doc.fields.as_object_mut(), fields.as_object()) {
            for (key, value) in changes {
                existing.insert(key.clone(), value.clone());
            }
        }
        Ok(doc.clone())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), DocumentError> {
        self.check_failure()?;
        let mut collections = self.collections.lock().unwrap();
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| DocumentError::Rejected {
                status: 404,
                message: "Collection could not be found".to_string(),
            })?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(DocumentError::Rejected {
                status: 404,
                message: "Document with the requested ID could not be found".to_string(),
            });
        }
        Ok(())
    }
}
