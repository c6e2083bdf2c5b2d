//! In-memory identity provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::models::Principal;
use crate::traits::{IdentityError, IdentityProvider};

#[derive(Debug, Clone)]
struct Account {
    password: String,
    principal: Principal,
}

/// In-memory identity provider.
///
/// Accounts live in a map keyed by email; at most one session (the "current"
/// one) exists at a time, mirroring the single-client view the coordinators
/// have of the real provider.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentity {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    session: Arc<Mutex<Option<String>>>,
    fail_next: Arc<Mutex<Option<String>>>,
}

impl InMemoryIdentity {
    /// Create an empty provider with no accounts and no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account without going through `create_account`.
    pub fn register(&self, email: &str, password: &str, name: &str) -> Principal {
        let principal = Principal {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                principal: principal.clone(),
            },
        );
        principal
    }

    /// Open a session for a seeded account, bypassing credential checks.
    pub fn open_session(&self, email: &str) {
        *self.session.lock().unwrap() = Some(email.to_string());
    }

    /// True while a session is open.
    pub fn has_session(&self) -> bool {
        self.session.lock().unwrap().is_some()
    }

    /// Make the next call fail with a connection error.
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    fn take_failure(&self) -> Option<IdentityError> {
        self.fail_next
            .lock()
            .unwrap()
            .take()
            .map(IdentityError::Connection)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Principal, IdentityError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        if self.accounts.lock().unwrap().contains_key(email) {
            return Err(IdentityError::Rejected {
                status: 409,
                message: "A user with the same email already exists".to_string(),
            });
        }
        Ok(self.register(email, password, name))
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<(), IdentityError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(account) if account.password == password => {
                *self.session.lock().unwrap() = Some(email.to_string());
                Ok(())
            }
            _ => Err(IdentityError::Rejected {
                status: 401,
                message: "Invalid credentials".to_string(),
            }),
        }
    }

    async fn current_principal(&self) -> Result<Principal, IdentityError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let session = self.session.lock().unwrap();
        let email = session.as_ref().ok_or(IdentityError::NotAuthenticated)?;
        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .map(|a| a.principal.clone())
            .ok_or(IdentityError::NotAuthenticated)
    }

    async fn delete_current_session(&self) -> Result<(), IdentityError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        *self.session.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_account_rejects_duplicates() {
        let provider = InMemoryIdentity::new();
        provider.create_account("a@x.com", "pw", "A").await.unwrap();
        let err = provider
            .create_account("a@x.com", "pw", "A")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Rejected { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_create_account_does_not_open_session() {
        let provider = InMemoryIdentity::new();
        provider.create_account("a@x.com", "pw", "A").await.unwrap();
        assert!(!provider.has_session());
        let err = provider.current_principal().await.unwrap_err();
        assert!(err.is_not_authenticated());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let provider = InMemoryIdentity::new();
        provider.register("a@x.com", "pw", "A");

        provider.create_session("a@x.com", "pw").await.unwrap();
        let principal = provider.current_principal().await.unwrap();
        assert_eq!(principal.email, "a@x.com");

        provider.delete_current_session().await.unwrap();
        assert!(!provider.has_session());
    }

    #[tokio::test]
    async fn test_fail_next_hits_exactly_one_call() {
        let provider = InMemoryIdentity::new();
        provider.register("a@x.com", "pw", "A");
        provider.fail_next("down");

        let err = provider.create_session("a@x.com", "pw").await.unwrap_err();
        assert!(matches!(err, IdentityError::Connection(_)));
        // The failure is consumed; the retry succeeds.
        provider.create_session("a@x.com", "pw").await.unwrap();
    }
}
