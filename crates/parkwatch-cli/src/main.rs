//! Parkwatch CLI: submit a parking-lot mask and a video for spot detection.
//!
//! Set PARKWATCH_SERVER_URL (or API_URL) or pass --server. No authentication.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use parkwatch_api_client::ApiClient;
use parkwatch_cli::{banner, init_tracing, print_json, ConsoleNotifier};
use parkwatch_core::{ClientConfig, MediaFile, MediaKind, SubmissionForm};

#[derive(Parser)]
#[command(name = "parkwatch", about = "Parking spot detection client")]
struct Cli {
    /// Do not print the banner
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload the mask image and video for processing
    Submit {
        #[command(flatten)]
        media: MediaArgs,
        /// Detection service URL (overrides PARKWATCH_SERVER_URL)
        #[arg(long)]
        server: Option<String>,
    },
    /// Validate the selection locally and show what would be sent
    Inspect {
        #[command(flatten)]
        media: MediaArgs,
    },
    /// Check that the detection service is reachable
    Check {
        /// Detection service URL (overrides PARKWATCH_SERVER_URL)
        #[arg(long)]
        server: Option<String>,
    },
}

#[derive(Args)]
struct MediaArgs {
    /// Parking-lot mask image
    #[arg(long)]
    image: PathBuf,
    /// Video to analyse
    #[arg(long)]
    video: PathBuf,
    /// Declared image content type (default: from the file extension)
    #[arg(long)]
    image_type: Option<String>,
    /// Declared video content type (default: from the file extension)
    #[arg(long)]
    video_type: Option<String>,
}

fn load_config(server: Option<String>) -> anyhow::Result<ClientConfig> {
    let config = ClientConfig::from_env().context("Invalid configuration")?;
    let config = match server {
        Some(url) => config.with_server_url(url).context("Invalid --server")?,
        None => config,
    };
    tracing::debug!(
        server_url = %config.server_url,
        request_timeout_secs = config.request_timeout_secs,
        "Configuration loaded"
    );
    Ok(config)
}

async fn select_media(
    config: &ClientConfig,
    client: ApiClient,
    media: &MediaArgs,
) -> anyhow::Result<SubmissionForm> {
    let validator = config.validator();
    let form = SubmissionForm::new(Arc::new(client))
        .with_notifier(Arc::new(ConsoleNotifier))
        .with_validator(validator);

    let selections = [
        (MediaKind::Image, &media.image, media.image_type.as_deref()),
        (MediaKind::Video, &media.video, media.video_type.as_deref()),
    ];
    for (kind, path, content_type) in selections {
        let file = MediaFile::from_path_with_type(path, content_type, validator.max_size(kind))
            .await
            .with_context(|| format!("Failed to load {} file", kind))?;
        form.select_file(kind, file)
            .with_context(|| format!("Rejected {} file {}", kind, path.display()))?;
    }

    Ok(form)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if !cli.quiet {
        eprintln!("{}", banner());
    }

    match cli.command {
        Commands::Submit { media, server } => {
            let config = load_config(server)?;
            let client = ApiClient::from_config(&config)?;
            let form = select_media(&config, client, &media).await?;
            let response = form
                .submit()
                .await
                .with_context(|| format!("Submission to {} failed", config.server_url))?;
            print_json(&response)?;
        }
        Commands::Inspect { media } => {
            let config = load_config(None)?;
            let client = ApiClient::from_config(&config)?;
            let form = select_media(&config, client, &media).await?;
            print_json(&form.snapshot())?;
        }
        Commands::Check { server } => {
            let config = load_config(server)?;
            let client = ApiClient::from_config(&config)?;
            let status = client
                .health()
                .await
                .with_context(|| format!("{} is not reachable", config.server_url))?;
            print_json(&serde_json::json!({
                "server": config.server_url,
                "reachable": true,
                "status": status,
            }))?;
        }
    }

    Ok(())
}
