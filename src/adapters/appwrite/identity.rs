//! Appwrite-backed identity provider.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::adapters::appwrite::client::{AppwriteClient, AppwriteError};
use crate::models::Principal;
use crate::traits::{IdentityError, IdentityProvider};

/// Account object (POST /account, GET /account).
#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(rename = "$id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

impl From<AccountResponse> for Principal {
    fn from(account: AccountResponse) -> Self {
        Principal {
            id: account.id,
            name: account.name,
            email: account.email,
        }
    }
}

/// Session object (POST /account/sessions/email).
#[derive(Debug, Deserialize)]
struct SessionResponse {
    /// Session secret for the `X-Appwrite-Session` header. Empty when the
    /// project is configured for cookie-only sessions.
    #[serde(default)]
    secret: String,
}

/// Identity provider over the Appwrite account API.
#[derive(Debug, Clone)]
pub struct AppwriteIdentity {
    client: Arc<AppwriteClient>,
}

impl AppwriteIdentity {
    /// Create a provider over the shared client.
    pub fn new(client: Arc<AppwriteClient>) -> Self {
        Self { client }
    }

    fn convert_error(e: AppwriteError) -> IdentityError {
        match e {
            AppwriteError::Api {
                status, message, ..
            } => IdentityError::Rejected { status, message },
            AppwriteError::Http(e) if e.is_connect() || e.is_timeout() => {
                IdentityError::Connection(e.to_string())
            }
            AppwriteError::Http(e) => IdentityError::Other(e.to_string()),
            AppwriteError::Json(e) => IdentityError::InvalidResponse(e.to_string()),
        }
    }
}

#[async_trait]
impl IdentityProvider for AppwriteIdentity {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Principal, IdentityError> {
        let body = json!({
            "userId": "unique()",
            "email": email,
            "password": password,
            "name": name,
        });
        let builder = self.client.request(Method::POST, "/account").json(&body);
        let account: AccountResponse = self
            .client
            .send_json(builder)
            .await
            .map_err(Self::convert_error)?;
        Ok(account.into())
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<(), IdentityError> {
        let body = json!({ "email": email, "password": password });
        let builder = self
            .client
            .request(Method::POST, "/account/sessions/email")
            .json(&body);
        let session: SessionResponse = self
            .client
            .send_json(builder)
            .await
            .map_err(Self::convert_error)?;
        if !session.secret.is_empty() {
            self.client.set_session(Some(session.secret));
        }
        Ok(())
    }

    async fn current_principal(&self) -> Result<Principal, IdentityError> {
        let builder = self.client.request(Method::GET, "/account");
        let account: AccountResponse =
            self.client.send_json(builder).await.map_err(|e| match e {
                // 401 here means "no session", the expected resume outcome.
                AppwriteError::Api { status: 401, .. } => IdentityError::NotAuthenticated,
                other => Self::convert_error(other),
            })?;
        Ok(account.into())
    }

    async fn delete_current_session(&self) -> Result<(), IdentityError> {
        let builder = self
            .client
            .request(Method::DELETE, "/account/sessions/current");
        let result = self.client.send_empty(builder).await;
        // The secret is gone either way; keeping it would only replay a dead
        // session on the next request.
        self.client.set_session(None);
        result.map_err(Self::convert_error)
    }
}
