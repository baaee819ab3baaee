#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Prompt source failed for {category}: {message}")]
    PromptSource {
        category: &'static str,
        message: String,
    },
}
