//! Application context: both coordinators plus the blob store, wired over
//! one set of backend adapters.
//!
//! The presentation layer receives an [`App`] by injection instead of
//! reaching for process-wide singletons; tests build one over the mock
//! adapters. The app also owns the two couplings that span coordinators:
//! logout resets the contact store, and image uploads happen before the
//! contact write they belong to.

use bytes::Bytes;
use std::sync::Arc;
use tracing::warn;

use crate::error::{AppError, StoreError, UploadError};
use crate::models::{Contact, ContactDraft, ContactUpdate, Principal};
use crate::state::{AuthCoordinator, ContactStore};
use crate::traits::{BlobStore, DocumentStore, IdentityProvider};

/// Image bytes attached to an add or edit intent.
#[derive(Debug, Clone)]
pub struct Image {
    /// Original file name, forwarded to the blob store.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Bytes,
}

/// The two state containers and their shared backend wiring.
pub struct App<I, D, B> {
    /// Session owner.
    pub auth: AuthCoordinator<I>,
    /// Contact collection owner.
    pub contacts: ContactStore<D>,
    blobs: Arc<B>,
    bucket_id: String,
}

impl<I, D, B> App<I, D, B>
where
    I: IdentityProvider,
    D: DocumentStore,
    B: BlobStore,
{
    /// Wire an app over the given adapters.
    pub fn new(
        identity: Arc<I>,
        documents: Arc<D>,
        blobs: Arc<B>,
        collection_id: impl Into<String>,
        bucket_id: impl Into<String>,
    ) -> Self {
        Self {
            auth: AuthCoordinator::new(identity),
            contacts: ContactStore::new(documents, collection_id),
            blobs,
            bucket_id: bucket_id.into(),
        }
    }

    /// Resume the previous session, if any, at application start.
    pub async fn bootstrap(&mut self) -> Option<Principal> {
        self.auth.resume_session().await
    }

    /// Log out and drop the signed-out user's contacts from memory.
    pub async fn log_out(&mut self) {
        self.auth.log_out().await;
        self.contacts.reset();
    }

    /// Owner id for contact operations; absent when not signed in.
    fn owner_id(&self) -> Result<String, StoreError> {
        self.auth
            .session()
            .user_id()
            .map(str::to_string)
            .ok_or(StoreError::MissingOwner)
    }

    /// Re-fetch the signed-in user's contacts.
    pub async fn refresh_contacts(&mut self) -> Result<(), AppError> {
        let owner = self.owner_id()?;
        self.contacts.fetch(&owner).await?;
        Ok(())
    }

    /// Upload an image and return its retrievable URL.
    async fn upload_image(&self, image: Image) -> Result<String, UploadError> {
        let file = self
            .blobs
            .create_file(&self.bucket_id, &image.filename, image.bytes)
            .await
            .map_err(|e| {
                warn!("image upload failed: {}", e);
                UploadError::Upload(e.to_string())
            })?;
        Ok(self.blobs.file_preview_url(&self.bucket_id, &file.id))
    }

    /// Add a contact, uploading the image first when one is attached.
    ///
    /// A failed upload aborts the intent; the contact write is never
    /// attempted with a missing image.
    pub async fn add_contact(
        &mut self,
        mut draft: ContactDraft,
        image: Option<Image>,
    ) -> Result<Contact, AppError> {
        let owner = self.owner_id()?;
        if let Some(image) = image {
            draft.image_url = Some(self.upload_image(image).await?);
        }
        Ok(self.contacts.add(draft, &owner).await?)
    }

    /// Edit a contact, uploading the replacement image first when one is
    /// attached.
    pub async fn update_contact(
        &mut self,
        id: &str,
        mut changes: ContactUpdate,
        image: Option<Image>,
    ) -> Result<Contact, AppError> {
        if let Some(image) = image {
            changes.image_url = Some(self.upload_image(image).await?);
        }
        Ok(self.contacts.update(id, changes).await?)
    }

    /// Delete a contact.
    pub async fn delete_contact(&mut self, id: &str) -> Result<(), AppError> {
        Ok(self.contacts.delete(id).await?)
    }
}
