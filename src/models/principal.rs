//! Identity types: the provider-issued principal and the local session.

use serde::{Deserialize, Serialize};

/// The authenticated identity record returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque user identifier assigned by the provider.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address the account was registered with.
    pub email: String,
}

/// Local representation of the current authenticated principal.
///
/// Owned exclusively by the auth coordinator; every other component reads it
/// through the coordinator's state and never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    /// The current principal, present only while authenticated.
    pub principal: Option<Principal>,
    /// Whether a live provider session backs this principal.
    pub authenticated: bool,
}

impl Session {
    /// An empty, unauthenticated session.
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// A session backed by a freshly fetched principal.
    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            authenticated: true,
        }
    }

    /// The owner identifier contact operations are scoped to, if signed in.
    pub fn user_id(&self) -> Option<&str> {
        self.principal.as_ref().map(|p| p.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_unauthenticated_session_has_no_user_id() {
        let session = Session::unauthenticated();
        assert!(!session.authenticated);
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn test_authenticated_session_exposes_user_id() {
        let session = Session::authenticated(principal());
        assert!(session.authenticated);
        assert_eq!(session.user_id(), Some("u1"));
    }
}
