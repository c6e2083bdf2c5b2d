//! Domain models shared across coordinators, adapters, and the CLI.

pub mod contact;
pub mod principal;

pub use contact::{Contact, ContactDraft, ContactUpdate, Gender};
pub use principal::{Principal, Session};
