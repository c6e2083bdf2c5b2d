//! Appwrite-backed blob store.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::appwrite::client::{AppwriteClient, AppwriteError};
use crate::traits::{BlobError, BlobStore, StoredFile};

/// File object (POST /storage/buckets/{bucket}/files).
#[derive(Debug, Deserialize)]
struct FileResponse {
    #[serde(rename = "$id")]
    id: String,
}

/// Blob store over the Appwrite storage API.
#[derive(Debug, Clone)]
pub struct AppwriteBlobs {
    client: Arc<AppwriteClient>,
}

impl AppwriteBlobs {
    /// Create a store over the shared client.
    pub fn new(client: Arc<AppwriteClient>) -> Self {
        Self { client }
    }

    fn convert_error(e: AppwriteError) -> BlobError {
        match e {
            AppwriteError::Api {
                status, message, ..
            } => BlobError::Rejected { status, message },
            AppwriteError::Http(e) if e.is_connect() || e.is_timeout() => {
                BlobError::Connection(e.to_string())
            }
            AppwriteError::Http(e) => BlobError::Other(e.to_string()),
            AppwriteError::Json(e) => BlobError::InvalidResponse(e.to_string()),
        }
    }
}

#[async_trait]
impl BlobStore for AppwriteBlobs {
    async fn create_file(
        &self,
        bucket: &str,
        filename: &str,
        bytes: Bytes,
    ) -> Result<StoredFile, BlobError> {
        let path = format!("/storage/buckets/{}/files", bucket);
        let form = Form::new()
            .text("fileId", "unique()")
            .part("file", Part::bytes(bytes.to_vec()).file_name(filename.to_string()));
        let builder = self.client.request(Method::POST, &path).multipart(form);
        let file: FileResponse = self
            .client
            .send_json(builder)
            .await
            .map_err(Self::convert_error)?;
        Ok(StoredFile { id: file.id })
    }

    fn file_preview_url(&self, bucket: &str, file_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/view?project={}",
            self.client.endpoint(),
            bucket,
            file_id,
            self.client.project_id()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_url_derivation() {
        let client = Arc::new(AppwriteClient::new("http://localhost/v1", "proj"));
        let blobs = AppwriteBlobs::new(client);
        assert_eq!(
            blobs.file_preview_url("photos", "f1"),
            "http://localhost/v1/storage/buckets/photos/files/f1/view?project=proj"
        );
    }
}
