//! Coordinator-boundary error types.
//!
//! Backend failures are caught at the coordinator boundary and converted to
//! these types; the message is also recorded in the owning coordinator's
//! state so the presentation layer only ever sees stored strings, never raw
//! provider errors.

use thiserror::Error;

/// Errors surfaced by the auth coordinator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The identity provider refused to create the account (duplicate
    /// address, weak password).
    #[error("account creation failed: {0}")]
    AccountCreation(String),

    /// Credentials were rejected or the profile fetch failed.
    #[error("authentication failed: {0}")]
    Authentication(String),
}

/// Errors surfaced by the contact store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A contact operation was issued without a signed-in owner. Programmer
    /// error; a correct UI flow never reaches the store unauthenticated.
    #[error("an owner id is required for this operation")]
    MissingOwner,

    /// Listing contacts failed.
    #[error("failed to fetch contacts: {0}")]
    Fetch(String),

    /// Creating, updating, or deleting a contact failed.
    #[error("failed to write contact: {0}")]
    Write(String),
}

/// Errors surfaced by the image-upload orchestration in the app context.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    /// The blob upload failed; the contact write was not attempted.
    #[error("image upload failed: {0}")]
    Upload(String),
}

/// Union of the errors an app-level intent can settle with.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Upload(#[from] UploadError),
}
