//! Rolodex - a contact manager client for Appwrite-compatible backends.
//!
//! The core is a pair of state containers, [`state::AuthCoordinator`] and
//! [`state::ContactStore`], driven through three capability traits
//! ([`traits::IdentityProvider`], [`traits::DocumentStore`],
//! [`traits::BlobStore`]). Production adapters speak Appwrite's REST API;
//! in-memory adapters back the tests.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod session_file;
pub mod state;
pub mod traits;
