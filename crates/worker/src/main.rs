//! Headless generation run: same pipeline as `/generate`, progress goes to
//! the log instead of an HTTP stream.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xgen_core::prompts::TemplatePromptSource;
use xgen_core::RunStatistics;
use xgen_events::TracingSink;
use xgen_imagen::{token, ImagenConfig, VertexImagenProvider};
use xgen_pipeline::{GenerationWorker, ImageCounts, OutputDirs, PacingConfig};

mod check;

#[derive(Debug, Parser)]
#[command(name = "xgen-worker")]
#[command(about = "Generate placeholder header and profile images with Vertex AI Imagen")]
#[command(
    after_help = "Environment:\n  GOOGLE_CLOUD_PROJECT             Project to bill\n  GOOGLE_APPLICATION_CREDENTIALS   Service-account key (gcloud CLI otherwise)\n  BATCH_SIZE, IMAGE_DELAY_SECS, BATCH_DELAY_SECS   Pacing"
)]
struct Cli {
    /// Number of header images (3:1).
    #[arg(long, default_value_t = 150)]
    headers: usize,
    /// Number of profile images (1:1).
    #[arg(long, default_value_t = 150)]
    profiles: usize,
    #[arg(long)]
    header_dir: Option<PathBuf>,
    #[arg(long)]
    profile_dir: Option<PathBuf>,
    /// Where progress and final reports go.
    #[arg(long, default_value = "generated_images")]
    report_dir: PathBuf,
    /// Small smoke run: 2 headers and 2 profiles.
    #[arg(long, default_value_t = false)]
    test: bool,
    /// Verify project, credentials and Imagen access, then exit.
    #[arg(long, default_value_t = false, conflicts_with = "test")]
    check: bool,
}

impl Cli {
    fn counts(&self) -> ImageCounts {
        if self.test {
            ImageCounts::new(2, 2)
        } else {
            ImageCounts::new(self.headers, self.profiles)
        }
    }

    fn output_dirs(&self) -> OutputDirs {
        let mut output = OutputDirs::under(&self.report_dir);
        if let Some(dir) = &self.header_dir {
            output.header_dir = dir.clone();
        }
        if let Some(dir) = &self.profile_dir {
            output.profile_dir = dir.clone();
        }
        output
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "xgen_worker=debug,xgen_pipeline=info,xgen_events=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let cli = Cli::parse();
    let counts = cli.counts();
    let output = cli.output_dirs();

    let imagen = ImagenConfig::from_env();
    let tokens = token::from_config(&imagen, reqwest::Client::new())
        .context("Failed to load Google Cloud credentials")?;
    let provider = Arc::new(VertexImagenProvider::new(imagen.clone(), tokens.clone()));

    if cli.check {
        let checks = check::run(&imagen, tokens.as_ref(), provider.as_ref()).await;
        check::print(&checks);
        let failed = checks.iter().filter(|c| !c.passed()).count();
        if failed > 0 {
            anyhow::bail!("{failed} setup check(s) failed");
        }
        return Ok(());
    }

    let worker = GenerationWorker::new(
        provider,
        Arc::new(TracingSink),
        PacingConfig::from_env(),
        output.clone(),
    );

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl-C, stopping after the current image");
            on_ctrl_c.cancel();
        }
    });

    let stats = worker
        .generate(counts, &TemplatePromptSource::new(), &cancel)
        .await
        .context("Generation run failed")?;

    print_summary(&stats, &output);
    Ok(())
}

fn print_summary(stats: &RunStatistics, output: &OutputDirs) {
    println!("{}", "=".repeat(50));
    println!("GENERATION COMPLETE");
    println!("{}", "=".repeat(50));
    println!(
        "Headers: {}/{} successful",
        stats.headers_successful, stats.headers_requested
    );
    println!(
        "Profiles: {}/{} successful",
        stats.profiles_successful, stats.profiles_requested
    );
    println!("Success rate: {:.1}%", stats.success_rate());
    for error in &stats.errors {
        println!("  {} {}: Failed - {}", error.image_type, error.image_id, error.error);
    }
    println!("Images saved to: {}", output.describe());
    println!("Reports saved to: {}", output.report_dir.display());
    println!("{}", "=".repeat(50));
}
