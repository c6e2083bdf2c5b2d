//! In-memory test doubles for the backend capability traits.
//!
//! Each fake keeps its records behind `Arc<Mutex<..>>` so tests can clone a
//! handle, hand it to a coordinator, and keep inspecting it afterwards. A
//! one-shot `fail_next` hook injects a connection failure into the next
//! call, which is how tests exercise the error paths without a network.

pub mod blobs;
pub mod documents;
pub mod identity;

pub use blobs::InMemoryBlobs;
pub use documents::InMemoryDocuments;
pub use identity::InMemoryIdentity;
