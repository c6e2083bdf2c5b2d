//! State containers sitting between the presentation layer and the backend.
//!
//! Two coordinators own all mutable client state: [`AuthCoordinator`] for
//! the session and [`ContactStore`] for the contact collection. The
//! presentation layer dispatches intents to them, awaits the backend call,
//! and re-reads the owned state afterwards. Each coordinator's state is
//! mutated only by its own completion handlers; under a cooperative event
//! loop those run to completion without interleaving, so transitions are
//! atomic with respect to each other (last write wins across racing
//! requests).

pub mod auth;
pub mod contacts;

pub use auth::{AuthCoordinator, AuthState};
pub use contacts::{ContactStore, ContactsState};

/// Lifecycle of the most recent request of a coordinator's operation class.
///
/// A new request moves the phase back to `Pending` and clears the previous
/// terminal state's error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    /// No request issued yet.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last request settled successfully.
    Succeeded,
    /// The last request settled with an error.
    Failed,
}

impl RequestPhase {
    /// True while a request is in flight.
    pub fn is_pending(self) -> bool {
        self == RequestPhase::Pending
    }

    /// True once a request has settled, either way.
    pub fn is_settled(self) -> bool {
        matches!(self, RequestPhase::Succeeded | RequestPhase::Failed)
    }
}
