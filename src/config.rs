//! Backend configuration.
//!
//! Identifies the hosted project the client talks to: API endpoint, project
//! id, and the database/collection/bucket the contact records and photos
//! live in. Loaded from the environment with builder-style overrides.

use thiserror::Error;

/// Default endpoint for the hosted backend.
pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

/// Environment variable names the config is read from.
pub const ENV_ENDPOINT: &str = "ROLODEX_ENDPOINT";
pub const ENV_PROJECT_ID: &str = "ROLODEX_PROJECT_ID";
pub const ENV_DATABASE_ID: &str = "ROLODEX_DATABASE_ID";
pub const ENV_COLLECTION_ID: &str = "ROLODEX_COLLECTION_ID";
pub const ENV_BUCKET_ID: &str = "ROLODEX_BUCKET_ID";

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL of the backend API.
    pub endpoint: String,
    /// Project identifier, sent with every request.
    pub project_id: String,
    /// Database the contact collection belongs to.
    pub database_id: String,
    /// Collection holding contact documents.
    pub collection_id: String,
    /// Bucket holding contact photos.
    pub bucket_id: String,
}

impl BackendConfig {
    /// Create a config with the default endpoint.
    pub fn new(
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
        bucket_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: project_id.into(),
            database_id: database_id.into(),
            collection_id: collection_id.into(),
            bucket_id: bucket_id.into(),
        }
    }

    /// Override the API endpoint (self-hosted backends).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Load the config from `ROLODEX_*` environment variables.
    ///
    /// `ROLODEX_ENDPOINT` is optional and defaults to the hosted cloud;
    /// the project, database, collection, and bucket ids are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        fn required(name: &'static str) -> Result<String, ConfigError> {
            match std::env::var(name) {
                Ok(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(ConfigError::MissingVar(name)),
            }
        }

        let endpoint = std::env::var(ENV_ENDPOINT)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(Self {
            endpoint,
            project_id: required(ENV_PROJECT_ID)?,
            database_id: required(ENV_DATABASE_ID)?,
            collection_id: required(ENV_COLLECTION_ID)?,
            bucket_id: required(ENV_BUCKET_ID)?,
        })
    }
}
