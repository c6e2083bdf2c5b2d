//! Shared HTTP client for the Appwrite adapters.
//!
//! Every request carries the `X-Appwrite-Project` header; once a session
//! exists its secret travels in `X-Appwrite-Session` (a CLI process has no
//! browser cookie jar to lean on). Provider errors arrive as JSON bodies of
//! the form `{"message": ..., "code": ..., "type": ...}`.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::{Arc, RwLock};

/// Error type for raw Appwrite calls, mapped to trait-level errors by the
/// individual adapters.
#[derive(Debug)]
pub enum AppwriteError {
    /// Transport-level failure.
    Http(reqwest::Error),
    /// The API answered with an error body.
    Api {
        status: u16,
        message: String,
        kind: String,
    },
    /// The API answered with a body we could not parse.
    Json(serde_json::Error),
}

impl AppwriteError {
    /// True when the failure never reached the API.
    pub fn is_connection(&self) -> bool {
        matches!(self, AppwriteError::Http(e) if e.is_connect() || e.is_timeout())
    }
}

impl std::fmt::Display for AppwriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppwriteError::Http(e) => write!(f, "HTTP error: {}", e),
            AppwriteError::Api {
                status, message, ..
            } => write!(f, "API error ({}): {}", status, message),
            AppwriteError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for AppwriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppwriteError::Http(e) => Some(e),
            AppwriteError::Json(e) => Some(e),
            AppwriteError::Api { .. } => None,
        }
    }
}

impl From<reqwest::Error> for AppwriteError {
    fn from(e: reqwest::Error) -> Self {
        AppwriteError::Http(e)
    }
}

impl From<serde_json::Error> for AppwriteError {
    fn from(e: serde_json::Error) -> Self {
        AppwriteError::Json(e)
    }
}

/// Error body the API returns on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
}

/// HTTP client shared by the Appwrite adapters.
///
/// Cheap to clone; the session secret lives behind a lock so the identity
/// adapter can install it after login and the document/blob adapters pick it
/// up on their next request.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    http: Client,
    endpoint: String,
    project_id: String,
    session: Arc<RwLock<Option<String>>>,
}

impl AppwriteClient {
    /// Create a client for the given endpoint and project.
    pub fn new(endpoint: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Base URL of the API, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Project identifier sent with every request.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Install or clear the session secret used for subsequent requests.
    pub fn set_session(&self, secret: Option<String>) {
        *self.session.write().unwrap() = secret;
    }

    /// The current session secret, if any.
    pub fn session_secret(&self) -> Option<String> {
        self.session.read().unwrap().clone()
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Start a request with the project and session headers applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header("X-Appwrite-Project", &self.project_id);
        if let Some(secret) = self.session_secret() {
            builder = builder.header("X-Appwrite-Session", secret);
        }
        builder
    }

    /// Send a request and parse a JSON response body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, AppwriteError> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        if !(200..300).contains(&status) {
            return Err(Self::api_error(status, &text));
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Send a request that answers with an empty body on success.
    pub async fn send_empty(&self, builder: RequestBuilder) -> Result<(), AppwriteError> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::api_error(status, &text));
        }
        Ok(())
    }

    fn api_error(status: u16, body: &str) -> AppwriteError {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or(ApiErrorBody {
            message: body.chars().take(200).collect(),
            kind: String::new(),
        });
        AppwriteError::Api {
            status,
            message: if parsed.message.is_empty() {
                format!("HTTP {}", status)
            } else {
                parsed.message
            },
            kind: parsed.kind,
        }
    }
}
