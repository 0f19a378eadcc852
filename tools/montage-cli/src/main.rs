//! Montage CLI: build clip montages from a source video.
//!
//! Usage:
//!   montage create <VIDEO> <ACTIONS> <USER> <TOKEN>   Extract, concatenate, notify
//!   montage watermark <VIDEO>                         Overlay the watermark image
//!   montage cleanup                                   Sweep the scratch clips directory
//!   montage check                                     Check encoder and configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use montage_common::config::MontageConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "montage",
    about = "Cut clips around timestamps and stitch them into one video",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file; environment variables override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a montage and notify the requesting user
    Create {
        /// Source video path (relative paths use PATH_VIDEOS_SOURCE)
        video: String,

        /// JSON array of timestamps or actions, e.g. "[10.5, 30.2, 45.7]"
        actions: String,

        /// JSON user descriptor forwarded to the notification service
        user: String,

        /// Bearer token for the notification service
        token: String,
    },

    /// Overlay the watermark image on an existing video
    Watermark {
        /// Video to watermark
        video: PathBuf,

        /// Watermark image (defaults to the configured image)
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Delete every file in the scratch clips directory
    Cleanup,

    /// Check encoder availability and configuration
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => MontageConfig::load(path),
        None => MontageConfig::from_env(),
    };

    let mut logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    montage_common::logging::init_logging(&logging);

    let config = loaded?;

    match cli.command {
        Commands::Create {
            video,
            actions,
            user,
            token,
        } => commands::create::run(config, video, actions, user, token).await,
        Commands::Watermark { video, image } => commands::watermark::run(config, video, image).await,
        Commands::Cleanup => commands::cleanup::run(config),
        Commands::Check => commands::check::run(config),
    }
}
