//! Bearer-token providers for the Vertex AI REST API.
//!
//! Credential acquisition is opaque to the rest of the system: the
//! provider hands back a token string or an error, nothing else.

mod gcloud;
mod service_account;

use std::sync::Arc;

use async_trait::async_trait;

pub use gcloud::GcloudCliTokenProvider;
pub use service_account::{ServiceAccountKey, ServiceAccountTokenProvider};

use crate::config::ImagenConfig;

/// Errors from acquiring an access token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The gcloud CLI could not be run or printed nothing, and no fallback
    /// token was set.
    #[error("gcloud CLI token unavailable ({reason}); run `gcloud auth application-default login` or set GOOGLE_ACCESS_TOKEN")]
    Gcloud { reason: String },

    /// The service-account key file could not be read or parsed.
    #[error("Service account key {path}: {reason}")]
    KeyFile { path: String, reason: String },

    /// Signing the JWT assertion failed.
    #[error("JWT signing failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// The OAuth token exchange failed.
    #[error("Token exchange failed: {0}")]
    Exchange(String),
}

/// Produces a bearer token for each API request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, TokenError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// A fixed token, e.g. from CI secrets.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, TokenError> {
        Ok(self.token.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Pick a token provider for the given configuration: the service-account
/// key when `credentials_file` is set, the gcloud CLI otherwise.
pub fn from_config(
    config: &ImagenConfig,
    client: reqwest::Client,
) -> Result<Arc<dyn TokenProvider>, TokenError> {
    match &config.credentials_file {
        Some(path) => {
            let key = ServiceAccountKey::from_file(path)?;
            Ok(Arc::new(ServiceAccountTokenProvider::new(key, client)))
        }
        None => Ok(Arc::new(GcloudCliTokenProvider::default())),
    }
}
