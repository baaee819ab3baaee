//! Token from `gcloud auth print-access-token`.

use async_trait::async_trait;
use tokio::process::Command;

use super::{TokenError, TokenProvider};

/// Environment variable consulted when the CLI is unavailable.
pub const FALLBACK_TOKEN_VAR: &str = "GOOGLE_ACCESS_TOKEN";

/// Shells out to the gcloud CLI for every request, falling back to an
/// environment variable.
#[derive(Debug, Clone)]
pub struct GcloudCliTokenProvider {
    program: String,
    fallback_var: String,
}

impl Default for GcloudCliTokenProvider {
    fn default() -> Self {
        Self::new("gcloud", FALLBACK_TOKEN_VAR)
    }
}

impl GcloudCliTokenProvider {
    pub fn new(program: impl Into<String>, fallback_var: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            fallback_var: fallback_var.into(),
        }
    }

    async fn from_cli(&self) -> Result<String, String> {
        let output = Command::new(&self.program)
            .args(["auth", "print-access-token"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {e}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{} exited with {}: {}", self.program, output.status, stderr.trim()));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(format!("{} printed an empty token", self.program));
        }
        Ok(token)
    }
}

#[async_trait]
impl TokenProvider for GcloudCliTokenProvider {
    async fn access_token(&self) -> Result<String, TokenError> {
        match self.from_cli().await {
            Ok(token) => Ok(token),
            Err(reason) => {
                if let Some(token) = std::env::var(&self.fallback_var)
                    .ok()
                    .filter(|t| !t.trim().is_empty())
                {
                    tracing::debug!(%reason, var = %self.fallback_var, "Using fallback access token");
                    return Ok(token);
                }
                Err(TokenError::Gcloud { reason })
            }
        }
    }

    fn name(&self) -> &'static str {
        "gcloud"
    }
}
