//! Identity provider trait abstraction.
//!
//! Covers the four session-lifecycle operations the auth coordinator needs:
//! account creation, session creation, current-principal lookup, and session
//! deletion.

use async_trait::async_trait;

use crate::models::Principal;

/// Identity provider errors.
#[derive(Debug, Clone)]
pub enum IdentityError {
    /// No valid session exists. Expected during session resume at startup.
    NotAuthenticated,
    /// The provider rejected the request (bad credentials, duplicate
    /// account, expired session).
    Rejected { status: u16, message: String },
    /// Could not reach the provider.
    Connection(String),
    /// The provider answered with something we could not parse.
    InvalidResponse(String),
    /// Other error.
    Other(String),
}

impl IdentityError {
    /// True for the expected "no session yet" outcome of a resume attempt.
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, IdentityError::NotAuthenticated)
    }
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityError::NotAuthenticated => write!(f, "Not authenticated"),
            IdentityError::Rejected { status, message } => {
                write!(f, "Rejected by identity provider ({}): {}", status, message)
            }
            IdentityError::Connection(msg) => write!(f, "Connection failed: {}", msg),
            IdentityError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            IdentityError::Other(msg) => write!(f, "Identity error: {}", msg),
        }
    }
}

impl std::error::Error for IdentityError {}

/// Trait for identity provider operations.
///
/// Implementations include the production Appwrite-backed provider and an
/// in-memory fake for tests.
///
/// # Example
///
/// ```ignore
/// use rolodex::traits::IdentityProvider;
///
/// async fn whoami<P: IdentityProvider>(provider: &P) -> Option<String> {
///     provider.current_principal().await.ok().map(|p| p.name)
/// }
/// ```
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new account with the provider.
    ///
    /// Does not open a session; callers log in separately afterwards.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Principal, IdentityError>;

    /// Open a session for the given credentials.
    async fn create_session(&self, email: &str, password: &str) -> Result<(), IdentityError>;

    /// Fetch the principal behind the current session.
    ///
    /// Fails with [`IdentityError::NotAuthenticated`] when no session exists.
    async fn current_principal(&self) -> Result<Principal, IdentityError>;

    /// Close the current session.
    async fn delete_current_session(&self) -> Result<(), IdentityError>;
}
