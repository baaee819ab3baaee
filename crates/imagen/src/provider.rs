//! The image-generation provider capability.

use async_trait::async_trait;
use xgen_core::category::AspectRatio;

use crate::error::ImagenError;

/// Result of one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOutcome {
    pub success: bool,
    pub image_bytes: Option<Vec<u8>>,
    pub error: Option<String>,
}

impl ImageOutcome {
    pub fn generated(image_bytes: Vec<u8>) -> Self {
        Self {
            success: true,
            image_bytes: Some(image_bytes),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            image_bytes: None,
            error: Some(error.into()),
        }
    }

    /// The image bytes of a successful call, or the failure message.
    ///
    /// A call that reports success without bytes is treated as a failure.
    pub fn into_result(self) -> Result<Vec<u8>, String> {
        match (self.success, self.image_bytes) {
            (true, Some(bytes)) => Ok(bytes),
            (true, None) => Err("No image generated".to_string()),
            (false, _) => Err(self.error.unwrap_or_else(|| "Unknown error".to_string())),
        }
    }
}

impl From<Result<Vec<u8>, ImagenError>> for ImageOutcome {
    fn from(result: Result<Vec<u8>, ImagenError>) -> Self {
        match result {
            Ok(bytes) => ImageOutcome::generated(bytes),
            Err(e) => ImageOutcome::failed(e.to_string()),
        }
    }
}

/// A synchronous-looking, fallible, rate-limited remote call that turns a
/// prompt into image bytes.
///
/// Implementations must not retry and must not panic; every failure is
/// reported through the returned [`ImageOutcome`]. Callers issue one
/// request at a time.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, prompt: &str, aspect_ratio: AspectRatio) -> ImageOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_without_bytes_is_a_failure() {
        let outcome = ImageOutcome {
            success: true,
            image_bytes: None,
            error: None,
        };
        assert_eq!(outcome.into_result(), Err("No image generated".to_string()));
    }

    #[test]
    fn failure_message_defaults() {
        let outcome = ImageOutcome {
            success: false,
            image_bytes: None,
            error: None,
        };
        assert_eq!(outcome.into_result(), Err("Unknown error".to_string()));
    }

    #[test]
    fn from_error_keeps_message() {
        let outcome: ImageOutcome = Err(ImagenError::Api("Rate limit exceeded".into())).into();
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Rate limit exceeded"));
    }
}
