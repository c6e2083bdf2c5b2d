//! Appwrite REST adapters.
//!
//! One adapter per capability trait, all sharing an [`AppwriteClient`]. The
//! wire surface is the subset of Appwrite's v1 API the original web client
//! used: account/session endpoints, database document CRUD with `queries[]`
//! parameters, and bucket file upload.

pub mod blobs;
pub mod client;
pub mod documents;
pub mod identity;

pub use blobs::AppwriteBlobs;
pub use client::{AppwriteClient, AppwriteError};
pub use documents::AppwriteDocuments;
pub use identity::AppwriteIdentity;
