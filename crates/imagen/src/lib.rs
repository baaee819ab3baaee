//! Image-generation provider capability and the Vertex AI Imagen client.
//!
//! The worker only sees [`ImageProvider`]. How a request is authenticated
//! is a separate, swappable [`TokenProvider`](token::TokenProvider):
//! gcloud CLI, a fixed token, or a service-account key.

pub mod config;
pub mod error;
pub mod provider;
pub mod token;
pub mod vertex;

pub use config::ImagenConfig;
pub use error::ImagenError;
pub use provider::{ImageOutcome, ImageProvider};
pub use vertex::VertexImagenProvider;
