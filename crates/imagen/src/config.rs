use std::path::PathBuf;
use std::time::Duration;

/// Negative prompt sent with every request unless overridden.
pub const DEFAULT_NEGATIVE_PROMPT: &str = "text, watermark, logo, brand, signature, low quality, \
     blurry, realistic photo, human, person, face, letters, words, writing";

/// Vertex AI Imagen configuration.
#[derive(Debug, Clone)]
pub struct ImagenConfig {
    /// Google Cloud project id. Requests fail per image when empty.
    pub project_id: String,
    /// Vertex AI region.
    pub location: String,
    /// Publisher model id.
    pub model: String,
    pub negative_prompt: String,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Service-account key file. When set, tokens come from the key instead
    /// of the gcloud CLI.
    pub credentials_file: Option<PathBuf>,
}

impl Default for ImagenConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: "us-central1".to_string(),
            model: "imagegeneration@006".to_string(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            request_timeout: Duration::from_secs(120),
            credentials_file: None,
        }
    }
}

impl ImagenConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default               |
    /// |----------------------------------|-----------------------|
    /// | `GOOGLE_CLOUD_PROJECT`           | (empty)               |
    /// | `VERTEX_LOCATION`                | `us-central1`         |
    /// | `IMAGEN_MODEL`                   | `imagegeneration@006` |
    /// | `IMAGEN_NEGATIVE_PROMPT`         | built-in list         |
    /// | `IMAGEN_REQUEST_TIMEOUT_SECS`    | `120`                 |
    /// | `GOOGLE_APPLICATION_CREDENTIALS` | (unset)               |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let request_timeout_secs: u64 = std::env::var("IMAGEN_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("IMAGEN_REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            project_id: std::env::var("GOOGLE_CLOUD_PROJECT").unwrap_or(defaults.project_id),
            location: std::env::var("VERTEX_LOCATION").unwrap_or(defaults.location),
            model: std::env::var("IMAGEN_MODEL").unwrap_or(defaults.model),
            negative_prompt: std::env::var("IMAGEN_NEGATIVE_PROMPT")
                .unwrap_or(defaults.negative_prompt),
            request_timeout: Duration::from_secs(request_timeout_secs),
            credentials_file: std::env::var("GOOGLE_APPLICATION_CREDENTIALS")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Full `:predict` endpoint URL for the configured model.
    pub fn predict_url(&self) -> String {
        format!(
            "https://{loc}-aiplatform.googleapis.com/v1/projects/{project}/locations/{loc}/publishers/google/models/{model}:predict",
            loc = self.location,
            project = self.project_id,
            model = self.model,
        )
    }
}
