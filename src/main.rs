//! Stagegen - build stage options for disk images and installer media.
//!
//! Reads declarative image requests (partition table, output format,
//! architecture, kernel) and writes manifests of stage options for the
//! pipeline executor.

mod commands;
mod timing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stagegen::Config;

#[derive(Parser)]
#[command(name = "stagegen")]
#[command(about = "Derive build stage options from image requests")]
#[command(
    after_help = "QUICK START:\n  stagegen manifest request.json     Print the manifest for one request\n  stagegen batch requests/ -o out/    Derive manifests for a directory\n  stagegen show arches                List architectures and boot media"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the manifest for one image request
    Manifest {
        /// Image request (JSON)
        request: PathBuf,
        /// Write the manifest here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Derive manifests for every *.json request in a directory
    Batch {
        /// Directory of image requests
        dir: PathBuf,
        /// Output directory for manifests
        #[arg(short, long, default_value = "manifests")]
        output: PathBuf,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Show supported output formats
    Formats,
    /// Show supported architectures
    Arches,
}

fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("STAGEGEN_LOG")
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing();

    let base_dir = std::env::current_dir()?;
    let config = Config::load(&base_dir);

    match cli.command {
        Commands::Manifest { request, output } => {
            commands::cmd_manifest(&request, output.as_deref(), &config)?;
        }

        Commands::Batch { dir, output } => {
            commands::cmd_batch(&dir, &output, &config)?;
        }

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Formats => commands::show::ShowTarget::Formats,
                ShowTarget::Arches => commands::show::ShowTarget::Arches,
            };
            commands::cmd_show(show_target, &config)?;
        }
    }

    Ok(())
}
