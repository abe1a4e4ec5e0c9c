//! PDF overlay editor CLI
//!
//! Drives an editing session against the remote document service:
//!
//! - `health`: check the service is up
//! - `inspect`: load every page and list its text regions
//! - `edit`: replace region text and save the recompiled document

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use overlay_http::ClientConfig;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod edits;

use edits::EditSpec;

/// Command-line arguments for the overlay editor
#[derive(Parser, Debug)]
#[command(name = "overlay-cli")]
#[command(about = "Edit the text of a PDF in place through the document service")]
struct Args {
    /// Document service URL
    #[arg(long, global = true, env = "OVERLAY_SERVER_URL")]
    server: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, env = "OVERLAY_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Pages fetched at once after the first
    #[arg(long, global = true, default_value = "1")]
    concurrency: usize,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the document service is reachable
    Health,

    /// Load a document and list its editable regions
    Inspect {
        /// PDF to open
        file: PathBuf,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace region text and save the recompiled document
    Edit {
        /// PDF to open
        file: PathBuf,

        /// Edit to apply, as PAGE:ID=TEXT (repeatable)
        #[arg(long = "set", value_parser = edits::parse_edit)]
        edits: Vec<EditSpec>,

        /// Where to write the result (defaults to edited_<name> next to the input)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut client_config = ClientConfig::default();
    if let Some(server) = args.server {
        client_config.base_url = server;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        client_config.timeout_ms = timeout_ms;
    }
    info!("Document service: {}", client_config.base_url);

    let ctx = commands::Context::new(client_config, args.concurrency)?;

    match args.command {
        Command::Health => commands::health(&ctx).await,
        Command::Inspect { file, json } => commands::inspect(&ctx, &file, json).await,
        Command::Edit { file, edits, out } => commands::edit(&ctx, &file, &edits, out).await,
    }
}
