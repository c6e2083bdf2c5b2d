//! In-memory blob store for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::traits::{BlobError, BlobStore, StoredFile};

/// In-memory blob store.
///
/// Tracks every upload so tests can assert that image-less writes never
/// touch the blob store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobs {
    files: Arc<Mutex<HashMap<String, (String, Bytes)>>>,
    fail_next: Arc<Mutex<Option<String>>>,
}

impl InMemoryBlobs {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next upload fail with a connection error.
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    /// Number of files uploaded so far.
    pub fn upload_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    /// Stored bytes for a file id.
    pub fn bytes_for(&self, file_id: &str) -> Option<Bytes> {
        self.files
            .lock()
            .unwrap()
            .get(file_id)
            .map(|(_, bytes)| bytes.clone())
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobs {
    async fn create_file(
        &self,
        _bucket: &str,
        filename: &str,
        bytes: Bytes,
    ) -> Result<StoredFile, BlobError> {
        if let Some(message) = self.fail_next.lock().unwrap().take() {
            return Err(BlobError::Connection(message));
        }
        let id = Uuid::new_v4().to_string();
        self.files
            .lock()
            .unwrap()
            .insert(id.clone(), (filename.to_string(), bytes));
        Ok(StoredFile { id })
    }

    fn file_preview_url(&self, bucket: &str, file_id: &str) -> String {
        format!("mock://{}/{}/view", bucket, file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_preview_url() {
        let blobs = InMemoryBlobs::new();
        let file = blobs
            .create_file("photos", "cat.png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        assert_eq!(blobs.upload_count(), 1);
        assert_eq!(blobs.bytes_for(&file.id).unwrap(), Bytes::from_static(b"png"));
        assert_eq!(
            blobs.file_preview_url("photos", &file.id),
            format!("mock://photos/{}/view", file.id)
        );
    }

    #[tokio::test]
    async fn test_fail_next_rejects_upload() {
        let blobs = InMemoryBlobs::new();
        blobs.fail_next("bucket offline");
        let err = blobs
            .create_file("photos", "cat.png", Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::Connection(_)));
        assert_eq!(blobs.upload_count(), 0);
    }
}
