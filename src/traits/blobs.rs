//! Blob store trait abstraction.
//!
//! Contact photos are uploaded as opaque blobs; what ends up on the contact
//! record is the retrievable preview URL, never the file id.

use async_trait::async_trait;
use bytes::Bytes;

/// A stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Store-assigned file identifier.
    pub id: String,
}

/// Blob store errors.
#[derive(Debug, Clone)]
pub enum BlobError {
    /// The store rejected the upload (size, type, permissions).
    Rejected { status: u16, message: String },
    /// Could not reach the store.
    Connection(String),
    /// The store answered with something we could not parse.
    InvalidResponse(String),
    /// Other error.
    Other(String),
}

impl std::fmt::Display for BlobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlobError::Rejected { status, message } => {
                write!(f, "Rejected by blob store ({}): {}", status, message)
            }
            BlobError::Connection(msg) => write!(f, "Connection failed: {}", msg),
            BlobError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            BlobError::Other(msg) => write!(f, "Blob store error: {}", msg),
        }
    }
}

impl std::error::Error for BlobError {}

/// Trait for blob store operations.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload a file and return its store-assigned identifier.
    async fn create_file(
        &self,
        bucket: &str,
        filename: &str,
        bytes: Bytes,
    ) -> Result<StoredFile, BlobError>;

    /// Derive the retrievable URL for an uploaded file.
    ///
    /// Pure derivation; performs no request.
    fn file_preview_url(&self, bucket: &str, file_id: &str) -> String;
}
