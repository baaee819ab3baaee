use std::path::PathBuf;
use std::str::FromStr;

use xgen_imagen::ImagenConfig;
use xgen_pipeline::{OutputDirs, PacingConfig};

/// Upper bound on images per category accepted by `/generate`.
pub const DEFAULT_MAX_IMAGES_PER_CATEGORY: usize = 150;

/// What happens to a run when its client goes away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisconnectPolicy {
    /// Stop the run at the next pause between images.
    #[default]
    Cancel,
    /// Keep generating with nobody listening.
    Finish,
}

impl FromStr for DisconnectPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cancel" => Ok(Self::Cancel),
            "finish" => Ok(Self::Finish),
            other => Err(format!("unknown disconnect policy '{other}'")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running the generator locally.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8888`).
    pub port: u16,
    /// Directory served for every path without a route (default: `static`).
    pub static_dir: PathBuf,
    /// Largest `headers`/`profiles` value `/generate` accepts.
    pub max_images_per_category: usize,
    pub on_disconnect: DisconnectPolicy,
    /// Allow more than one run at a time (default: `false`).
    pub allow_concurrent_runs: bool,
    /// Default output locations; a request may override the image folders.
    pub output: OutputDirs,
    pub pacing: PacingConfig,
    pub imagen: ImagenConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8888,
            static_dir: PathBuf::from("static"),
            max_images_per_category: DEFAULT_MAX_IMAGES_PER_CATEGORY,
            on_disconnect: DisconnectPolicy::default(),
            allow_concurrent_runs: false,
            output: OutputDirs::default(),
            pacing: PacingConfig::default(),
            imagen: ImagenConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default            |
    /// |---------------------------|--------------------|
    /// | `HOST`                    | `0.0.0.0`          |
    /// | `PORT`                    | `8888`             |
    /// | `STATIC_DIR`              | `static`           |
    /// | `MAX_IMAGES_PER_CATEGORY` | `150`              |
    /// | `ON_DISCONNECT`           | `cancel`           |
    /// | `ALLOW_CONCURRENT_RUNS`   | `false`            |
    /// | `REPORT_DIR`              | `generated_images` |
    ///
    /// Pacing and Imagen settings are read by [`PacingConfig::from_env`] and
    /// [`ImagenConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8888".into())
            .parse()
            .expect("PORT must be a valid u16");

        let static_dir = PathBuf::from(std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()));

        let max_images_per_category: usize = std::env::var("MAX_IMAGES_PER_CATEGORY")
            .unwrap_or_else(|_| DEFAULT_MAX_IMAGES_PER_CATEGORY.to_string())
            .parse()
            .expect("MAX_IMAGES_PER_CATEGORY must be a valid usize");

        let on_disconnect: DisconnectPolicy = std::env::var("ON_DISCONNECT")
            .unwrap_or_else(|_| "cancel".into())
            .parse()
            .expect("ON_DISCONNECT must be 'cancel' or 'finish'");

        let allow_concurrent_runs: bool = std::env::var("ALLOW_CONCURRENT_RUNS")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("ALLOW_CONCURRENT_RUNS must be 'true' or 'false'");

        let output = match std::env::var("REPORT_DIR") {
            Ok(dir) => OutputDirs::under(dir),
            Err(_) => OutputDirs::default(),
        };

        Self {
            host,
            port,
            static_dir,
            max_images_per_category,
            on_disconnect,
            allow_concurrent_runs,
            output,
            pacing: PacingConfig::from_env(),
            imagen: ImagenConfig::from_env(),
        }
    }
}
