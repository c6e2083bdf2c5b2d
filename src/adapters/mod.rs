//! Concrete implementations of the backend capability traits.
//!
//! # Adapters
//!
//! - [`appwrite`] - production adapters over the Appwrite REST API
//! - [`mock`] - in-memory test doubles
//!
//! The production adapters share one [`appwrite::AppwriteClient`], which
//! carries the project header and session secret every request needs.

pub mod appwrite;
pub mod mock;

pub use appwrite::{AppwriteBlobs, AppwriteClient, AppwriteDocuments, AppwriteIdentity};
pub use mock::{InMemoryBlobs, InMemoryDocuments, InMemoryIdentity};
