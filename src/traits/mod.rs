//! Trait abstractions for the backend capabilities the client consumes.
//!
//! The coordinators never talk to the hosted backend directly; they go
//! through these traits so tests can substitute in-memory fakes with zero
//! network dependency.
//!
//! # Traits
//!
//! - [`IdentityProvider`] - session lifecycle and principal lookup
//! - [`DocumentStore`] - contact record CRUD with filter/sort queries
//! - [`BlobStore`] - image upload and preview URL derivation

pub mod blobs;
pub mod documents;
pub mod identity;

pub use blobs::{BlobError, BlobStore, StoredFile};
pub use documents::{Document, DocumentError, DocumentStore, Filter, Permission, Role, Sort};
pub use identity::{IdentityError, IdentityProvider};
