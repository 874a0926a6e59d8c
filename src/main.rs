//! Wayfinder - multimodal map assistant simulator
//!
//! Reads one MMI envelope per stdin line, dispatches it against a dry-run
//! executor and prints what the assistant would say.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wayfinder::handlers::default_registry;
use wayfinder::speech::{OutputFormat, StdoutSink};
use wayfinder::{Assistant, Config, DryRunExecutor, Session};

/// Inbound frames buffered between stdin and the session
const INBOUND_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print outbound MMI speech requests instead of plain text
    #[arg(long)]
    mmi: bool,

    /// Override the idle threshold in seconds
    #[arg(long)]
    idle_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load()?,
    };
    if let Some(secs) = args.idle_secs {
        config.idle_threshold_secs = secs;
    }

    // Setup logging; stdout carries the spoken output
    let level = if args.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    info!("🗺️ Wayfinder v{} starting...", env!("CARGO_PKG_VERSION"));
    if args.config.is_none() {
        info!("📂 Config: {}", wayfinder::config::config_path().display());
    }

    let format = if args.mmi {
        OutputFormat::Mmi
    } else {
        OutputFormat::Plain
    };
    let sink = Arc::new(StdoutSink::new(format, config.language.clone()));
    let assistant = Assistant::from_config(
        &config,
        Arc::new(default_registry()),
        Arc::new(DryRunExecutor::new()),
    );
    let session = Session::from_config(&config, assistant, sink);

    let (tx, rx) = mpsc::channel::<String>(INBOUND_CAPACITY);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("⚠️ Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });

    info!("🎧 Reading envelopes from stdin (one per line)");
    session.run(rx).await;

    info!("👋 Wayfinder shutting down");
    Ok(())
}
