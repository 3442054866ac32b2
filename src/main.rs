//! xautotype - types text into the X11 window holding input focus
//!
//! Entry point for the CLI binary.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use xautotype::config::AutotypeConfig;
use xautotype::engine::{AutotypeEngine, InjectionRequest};
use xautotype::server::XSession;

/// Command-line arguments for xautotype
#[derive(Parser, Debug)]
#[command(name = "xautotype")]
#[command(version, about = "Types text into the X11 window holding input focus", long_about = None)]
pub struct Args {
    /// Text to type; read from stdin when omitted (one trailing
    /// newline is stripped so piped input does not press Return)
    pub text: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Milliseconds to wait between injected keys
    #[arg(long, env = "XAUTOTYPE_DELAY_MS")]
    pub delay_ms: Option<u64>,

    /// Force the SendEvent fallback even when XTEST is available
    #[arg(long)]
    pub send_event: bool,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let config = match &args.config {
        Some(path) => AutotypeConfig::load(path)?,
        None => AutotypeConfig::load_default()?,
    };
    let config = config.with_overrides(args.delay_ms, args.send_event);
    debug!(?config, "configuration loaded");

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut input = std::io::read_to_string(std::io::stdin())
                .context("failed to read text from stdin")?;
            if input.ends_with('\n') {
                input.pop();
            }
            input
        }
    };

    let session = XSession::open(config.display.as_deref())?;
    let engine = AutotypeEngine::new(session);
    let report = engine.send_string(
        &InjectionRequest::new(text)
            .with_method(config.method)
            .with_delay(config.inter_key_delay()),
    )?;

    info!(
        keys = report.keys_injected,
        strategy = ?report.strategy,
        "autotype complete"
    );
    Ok(())
}

fn init_logging(args: &Args) {
    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
