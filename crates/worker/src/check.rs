//! `xgen-worker --check`: confirm the project, credentials and Imagen access
//! work before starting a long run.

use xgen_core::category::AspectRatio;
use xgen_imagen::token::TokenProvider;
use xgen_imagen::{ImageProvider, ImagenConfig};

const CHECK_PROMPT: &str = "simple test pattern";

/// Outcome of one setup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupCheck {
    pub name: &'static str,
    pub outcome: Result<String, String>,
}

impl SetupCheck {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Run every setup step in order. The Imagen call is skipped when an
/// earlier step failed, since it could only repeat that failure.
pub async fn run(
    config: &ImagenConfig,
    tokens: &dyn TokenProvider,
    provider: &dyn ImageProvider,
) -> Vec<SetupCheck> {
    let project = SetupCheck {
        name: "project",
        outcome: if config.project_id.is_empty() {
            Err("GOOGLE_CLOUD_PROJECT is not set".to_string())
        } else {
            Ok(format!("{} ({})", config.project_id, config.location))
        },
    };

    let credentials = SetupCheck {
        name: "credentials",
        outcome: match tokens.access_token().await {
            Ok(_) => Ok(format!("{} token available", tokens.name())),
            Err(e) => Err(e.to_string()),
        },
    };

    let imagen = SetupCheck {
        name: "imagen",
        outcome: if project.passed() && credentials.passed() {
            provider
                .generate(CHECK_PROMPT, AspectRatio::Square)
                .await
                .into_result()
                .map(|bytes| format!("{} returned a {} byte image", config.model, bytes.len()))
        } else {
            Err("skipped until the checks above pass".to_string())
        },
    };

    vec![project, credentials, imagen]
}

pub fn print(checks: &[SetupCheck]) {
    for check in checks {
        match &check.outcome {
            Ok(detail) => println!("✓ {}: {}", check.name, detail),
            Err(reason) => println!("✗ {}: {}", check.name, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use xgen_imagen::token::{StaticTokenProvider, TokenError};
    use xgen_imagen::ImageOutcome;

    use super::*;

    /// Returns a fixed outcome and records the prompts it saw.
    struct FixedProvider {
        outcome: ImageOutcome,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedProvider {
        fn new(outcome: ImageOutcome) -> Self {
            Self {
                outcome,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ImageProvider for FixedProvider {
        async fn generate(&self, prompt: &str, _aspect_ratio: AspectRatio) -> ImageOutcome {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.outcome.clone()
        }
    }

    struct NoCredentials;

    #[async_trait]
    impl TokenProvider for NoCredentials {
        async fn access_token(&self) -> Result<String, TokenError> {
            Err(TokenError::Gcloud {
                reason: "not logged in".into(),
            })
        }

        fn name(&self) -> &'static str {
            "gcloud"
        }
    }

    fn configured() -> ImagenConfig {
        ImagenConfig {
            project_id: "demo-project".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn working_setup_passes_every_check() {
        let provider = FixedProvider::new(ImageOutcome::generated(vec![0; 64]));
        let checks = run(&configured(), &StaticTokenProvider::new("t"), &provider).await;

        assert!(checks.iter().all(SetupCheck::passed), "{checks:?}");
        assert_eq!(provider.calls(), 1);
        assert_eq!(
            checks[2].outcome,
            Ok("imagegeneration@006 returned a 64 byte image".to_string())
        );
    }

    #[tokio::test]
    async fn missing_project_skips_the_imagen_call() {
        let provider = FixedProvider::new(ImageOutcome::generated(vec![0; 8]));
        let checks = run(&ImagenConfig::default(), &StaticTokenProvider::new("t"), &provider).await;

        assert_eq!(checks[0].outcome, Err("GOOGLE_CLOUD_PROJECT is not set".to_string()));
        assert!(checks[1].passed());
        assert!(!checks[2].passed());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn credential_failure_is_reported() {
        let provider = FixedProvider::new(ImageOutcome::generated(vec![0; 8]));
        let checks = run(&configured(), &NoCredentials, &provider).await;

        let reason = checks[1].outcome.clone().unwrap_err();
        assert!(reason.contains("not logged in"), "{reason}");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced() {
        let provider = FixedProvider::new(ImageOutcome::failed(
            "Permission denied. Make sure Vertex AI API is enabled",
        ));
        let checks = run(&configured(), &StaticTokenProvider::new("t"), &provider).await;

        assert_eq!(
            checks[2].outcome,
            Err("Permission denied. Make sure Vertex AI API is enabled".to_string())
        );
    }
}
