//! Vertex AI Imagen REST client.
//!
//! Wraps the `:predict` endpoint of an Imagen publisher model using
//! [`reqwest`]. One request produces one image.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use xgen_core::category::AspectRatio;

use crate::config::ImagenConfig;
use crate::error::ImagenError;
use crate::provider::{ImageOutcome, ImageProvider};
use crate::token::TokenProvider;

/// HTTP client for the Imagen `:predict` endpoint.
pub struct VertexImagenProvider {
    client: reqwest::Client,
    config: ImagenConfig,
    tokens: Arc<dyn TokenProvider>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl VertexImagenProvider {
    pub fn new(config: ImagenConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self::with_client(client, config, tokens)
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling, tests).
    pub fn with_client(
        client: reqwest::Client,
        config: ImagenConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client,
            config,
            tokens,
        }
    }

    fn request_body(&self, prompt: &str, aspect_ratio: AspectRatio) -> serde_json::Value {
        serde_json::json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": aspect_ratio.as_str(),
                "negativePrompt": self.config.negative_prompt,
            },
        })
    }

    async fn predict(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<Vec<u8>, ImagenError> {
        if self.config.project_id.is_empty() {
            return Err(ImagenError::Config(
                "GOOGLE_CLOUD_PROJECT is not set".to_string(),
            ));
        }

        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(self.config.predict_url())
            .bearer_auth(token)
            .json(&self.request_body(prompt, aspect_ratio))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            if status.as_u16() == 400 {
                tracing::error!(body = %body, "Imagen rejected the request");
            }
            return Err(ImagenError::Api(describe_status(status.as_u16(), &body)));
        }

        let parsed: PredictResponse = response.json().await?;
        decode_prediction(parsed)
    }
}

#[async_trait]
impl ImageProvider for VertexImagenProvider {
    async fn generate(&self, prompt: &str, aspect_ratio: AspectRatio) -> ImageOutcome {
        let result = self.predict(prompt, aspect_ratio).await;
        if let Err(e) = &result {
            tracing::warn!(%aspect_ratio, error = %e, "Imagen request failed");
        }
        result.into()
    }
}

/// Turn a non-2xx status into the message recorded for the image.
///
/// - 429 → rate limit
/// - 403 → permission / API not enabled
/// - 400 → the API's own error message when the body has one
/// - anything else → the bare status code
pub fn describe_status(status: u16, body: &str) -> String {
    match status {
        429 => "Rate limit exceeded".to_string(),
        403 => "Permission denied - check if Imagen is enabled".to_string(),
        400 => {
            let detail = serde_json::from_str::<ApiErrorBody>(body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            format!("Bad request: {detail}")
        }
        other => format!("API returned {other}"),
    }
}

fn decode_prediction(response: PredictResponse) -> Result<Vec<u8>, ImagenError> {
    let encoded = response
        .predictions
        .into_iter()
        .next()
        .and_then(|p| p.bytes_base64_encoded)
        .filter(|b| !b.is_empty())
        .ok_or(ImagenError::EmptyResponse)?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| ImagenError::InvalidPayload(e.to_string()))?;

    let (width, height) = image::ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .map_err(|e| ImagenError::InvalidPayload(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ImagenError::InvalidPayload(e.to_string()))?;
    tracing::debug!(width, height, size = bytes.len(), "Decoded generated image");

    Ok(bytes)
}
