use crate::token::TokenError;

/// Errors from a single image-generation call.
///
/// None of these are fatal to a run: the worker records the message and
/// moves on to the next prompt.
#[derive(Debug, thiserror::Error)]
pub enum ImagenError {
    /// No bearer token could be obtained.
    #[error("Authentication failed: {0}")]
    Token(#[from] TokenError),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status. The message is already
    /// human-readable (see [`describe_status`](crate::vertex::describe_status)).
    #[error("{0}")]
    Api(String),

    /// A 2xx response that did not contain an image.
    #[error("No image generated")]
    EmptyResponse,

    /// The image payload could not be decoded.
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    /// Required configuration is missing.
    #[error("Configuration error: {0}")]
    Config(String),
}
