//! Auth coordinator: owns the session and its request lifecycle.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::AuthError;
use crate::models::{Principal, Session};
use crate::state::RequestPhase;
use crate::traits::IdentityProvider;

/// Observable auth state.
///
/// `loading` starts `true` so the presentation layer holds off rendering
/// authenticated routes until the initial session resume settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    /// The current session; unauthenticated until a login or resume lands.
    pub session: Session,
    /// True from application start until the first resume settles, and
    /// while any later auth request is in flight.
    pub loading: bool,
    /// Message of the last failed request, cleared when a new one starts.
    pub error: Option<String>,
    /// Lifecycle of the most recent auth request.
    pub phase: RequestPhase,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: Session::unauthenticated(),
            loading: true,
            error: None,
            phase: RequestPhase::Idle,
        }
    }
}

/// Coordinator for session lifecycle requests.
///
/// All provider failures are converted to string messages stored in
/// [`AuthState::error`]; no provider error type escapes to callers beyond
/// the returned [`AuthError`].
pub struct AuthCoordinator<I> {
    provider: Arc<I>,
    state: AuthState,
}

impl<I: IdentityProvider> AuthCoordinator<I> {
    /// Create a coordinator over the given identity provider.
    pub fn new(provider: Arc<I>) -> Self {
        Self {
            provider,
            state: AuthState::default(),
        }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Convenience accessor for the current session.
    pub fn session(&self) -> &Session {
        &self.state.session
    }

    /// True once a principal backs the session.
    pub fn is_authenticated(&self) -> bool {
        self.state.session.authenticated
    }

    fn begin(&mut self) {
        self.state.loading = true;
        self.state.error = None;
        self.state.phase = RequestPhase::Pending;
    }

    fn succeed(&mut self, session: Session) {
        self.state.session = session;
        self.state.loading = false;
        self.state.phase = RequestPhase::Succeeded;
    }

    fn fail(&mut self, message: String, clear_session: bool) {
        if clear_session {
            self.state.session = Session::unauthenticated();
        }
        self.state.error = Some(message);
        self.state.loading = false;
        self.state.phase = RequestPhase::Failed;
    }

    /// Create a new account, then immediately log in with the same
    /// credentials.
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(), AuthError> {
        self.begin();
        if let Err(e) = self.provider.create_account(email, password, name).await {
            warn!("account creation failed: {}", e);
            let err = AuthError::AccountCreation(e.to_string());
            self.fail(err.to_string(), false);
            return Err(err);
        }
        info!("account created for {}", email);
        self.log_in(email, password).await
    }

    /// Open a session and fetch the principal behind it.
    pub async fn log_in(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        self.begin();
        let outcome = async {
            self.provider.create_session(email, password).await?;
            self.provider.current_principal().await
        }
        .await;

        match outcome {
            Ok(principal) => {
                info!("logged in as {}", principal.id);
                self.succeed(Session::authenticated(principal));
                Ok(())
            }
            Err(e) => {
                warn!("login failed: {}", e);
                let err = AuthError::Authentication(e.to_string());
                // A rejected login always leaves the client signed out.
                self.fail(err.to_string(), true);
                Err(err)
            }
        }
    }

    /// Close the current session.
    ///
    /// Local state is reset to unauthenticated regardless of the remote
    /// outcome; a remote failure is recorded but never blocks the reset.
    pub async fn log_out(&mut self) {
        self.begin();
        let result = self.provider.delete_current_session().await;
        self.state.session = Session::unauthenticated();
        self.state.loading = false;
        match result {
            Ok(()) => {
                info!("logged out");
                self.state.phase = RequestPhase::Succeeded;
            }
            Err(e) => {
                warn!("remote logout failed, local session cleared anyway: {}", e);
                self.state.error = Some(e.to_string());
                self.state.phase = RequestPhase::Failed;
            }
        }
    }

    /// Attempt to restore a session at application start.
    ///
    /// "No session" is an expected outcome, not a failure: the session stays
    /// unauthenticated, loading stops, and no error is recorded. Returns the
    /// resumed principal when one exists.
    pub async fn resume_session(&mut self) -> Option<Principal> {
        self.begin();
        match self.provider.current_principal().await {
            Ok(principal) => {
                info!("resumed session for {}", principal.id);
                self.succeed(Session::authenticated(principal.clone()));
                Some(principal)
            }
            Err(e) if e.is_not_authenticated() => {
                debug!("no session found");
                self.state.session = Session::unauthenticated();
                self.state.loading = false;
                self.state.phase = RequestPhase::Succeeded;
                None
            }
            Err(e) => {
                warn!("session resume failed: {}", e);
                self.fail(e.to_string(), true);
                None
            }
        }
    }
}
