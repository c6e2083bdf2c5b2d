//! Document store trait abstraction.
//!
//! The document store persists contact records as schemaless documents with
//! store-assigned identifiers and per-document access control. Filters and
//! sorts are the small query surface the contact store actually uses; the
//! backend's own wire protocol stays behind the adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// A persisted record, identified by a store-assigned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: String,
    /// Creation time, assigned by the store.
    pub created_at: DateTime<Utc>,
    /// Document attributes as a JSON object.
    pub fields: Value,
}

/// Who a permission grant applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// A single principal.
    User(String),
}

impl Role {
    /// Role for the given principal id.
    pub fn user(id: impl Into<String>) -> Self {
        Role::User(id.into())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User(id) => write!(f, "user:{}", id),
        }
    }
}

/// A single access grant attached to a document on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    Read(Role),
    Write(Role),
    Update(Role),
    Delete(Role),
}

impl Permission {
    /// The full owner-only grant set: the given principal may read, write,
    /// update, and delete the record, and nobody else can see it.
    pub fn owner_only(user_id: &str) -> Vec<Permission> {
        vec![
            Permission::Read(Role::user(user_id)),
            Permission::Write(Role::user(user_id)),
            Permission::Update(Role::user(user_id)),
            Permission::Delete(Role::user(user_id)),
        ]
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Read(role) => write!(f, "read(\"{}\")", role),
            Permission::Write(role) => write!(f, "write(\"{}\")", role),
            Permission::Update(role) => write!(f, "update(\"{}\")", role),
            Permission::Delete(role) => write!(f, "delete(\"{}\")", role),
        }
    }
}

/// A list-query filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Attribute equals value.
    Equal { attribute: String, value: Value },
}

impl Filter {
    /// Equality filter on an attribute.
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Equal {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// A list-query sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sort {
    /// Ascending by attribute.
    Asc(String),
    /// Descending by attribute.
    Desc(String),
}

impl Sort {
    /// The store's creation-time attribute.
    pub const CREATED_AT: &'static str = "$createdAt";

    /// Newest records first.
    pub fn newest_first() -> Self {
        Sort::Desc(Self::CREATED_AT.to_string())
    }
}

/// Document store errors.
#[derive(Debug, Clone)]
pub enum DocumentError {
    /// The store rejected the request (permissions, validation, missing
    /// document).
    Rejected { status: u16, message: String },
    /// Could not reach the store.
    Connection(String),
    /// The store answered with something we could not parse.
    InvalidResponse(String),
    /// Other error.
    Other(String),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::Rejected { status, message } => {
                write!(f, "Rejected by document store ({}): {}", status, message)
            }
            DocumentError::Connection(msg) => write!(f, "Connection failed: {}", msg),
            DocumentError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            DocumentError::Other(msg) => write!(f, "Document store error: {}", msg),
        }
    }
}

impl std::error::Error for DocumentError {}

/// Trait for document store operations.
///
/// `collection` names the collection a document lives in; adapters resolve
/// it against whatever namespace (database id, table, ...) their backend
/// needs.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document with a store-assigned identifier.
    ///
    /// `permissions` scope who may access the record; see
    /// [`Permission::owner_only`].
    async fn create_document(
        &self,
        collection: &str,
        fields: Value,
        permissions: &[Permission],
    ) -> Result<Document, DocumentError>;

    /// List documents matching all `filters`, ordered by `sort`.
    async fn list_documents(
        &self,
        collection: &str,
        filters: &[Filter],
        sort: &[Sort],
    ) -> Result<Vec<Document>, DocumentError>;

    /// Replace the given attributes of a document; unnamed attributes keep
    /// their stored values.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Value,
    ) -> Result<Document, DocumentError>;

    /// Delete a document by identifier.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), DocumentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_wire_format() {
        assert_eq!(
            Permission::Read(Role::user("u1")).to_string(),
            "read(\"user:u1\")"
        );
        assert_eq!(
            Permission::Delete(Role::user("u1")).to_string(),
            "delete(\"user:u1\")"
        );
    }

    #[test]
    fn test_owner_only_grants_all_four_actions() {
        let perms = Permission::owner_only("u1");
        assert_eq!(perms.len(), 4);
        assert!(perms.contains(&Permission::Update(Role::user("u1"))));
    }

    #[test]
    fn test_newest_first_sorts_on_created_at() {
        assert_eq!(
            Sort::newest_first(),
            Sort::Desc(Sort::CREATED_AT.to_string())
        );
    }

    #[test]
    fn test_document_error_display() {
        assert_eq!(
            DocumentError::Rejected {
                status: 404,
                message: "Document not found".to_string()
            }
            .to_string(),
            "Rejected by document store (404): Document not found"
        );
    }
}
