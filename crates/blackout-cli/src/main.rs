//! Blackout CLI - mask PHI regions in scanned documents.
//!
//! The binary drives the full pipeline from recorded provider output
//! (OCR and PHI results as JSON), which makes it useful both as a
//! replay/debugging harness for provider drift and as a smoke test for
//! the geometry resolution itself.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blackout", version, about = "De-identify scanned medical documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run de-identification over a document with recorded provider output
    Run {
        /// Input document (TIFF or PNG)
        input: PathBuf,
        /// Recorded OCR result (JSON, normalized model)
        #[arg(long)]
        ocr: PathBuf,
        /// Recorded PHI entities (JSON array)
        #[arg(long)]
        phi: PathBuf,
        /// Masked output path; defaults to `<input>.masked.<ext>`
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the JSON run report here
        #[arg(long)]
        report: Option<PathBuf>,
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Render translucent annotated masks instead of opaque ones
        #[arg(long)]
        debug_masks: bool,
    },
    /// Print the offset index for recorded OCR output
    Inspect {
        /// Recorded OCR result (JSON, normalized model)
        #[arg(long)]
        ocr: PathBuf,
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            input,
            ocr,
            phi,
            output,
            report,
            config,
            debug_masks,
        } => commands::run_command(input, ocr, phi, output, report, config, debug_masks).await,
        Commands::Inspect { ocr, config } => commands::inspect_command(ocr, config),
    }
}
