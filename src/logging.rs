// Tracing setup. The terminal belongs to the UI, so logs only go to a file.
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// RUST_LOG wins over the level picked on the command line
pub fn init_tracing(log_file: Option<&Path>, default_level: &str) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    info!(log_file = %path.display(), version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(())
}
