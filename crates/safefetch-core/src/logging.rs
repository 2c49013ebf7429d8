//! Logging init: append to a file under the XDG state dir, or stderr.
//!
//! `RUST_LOG` overrides the default filter in both modes.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,safefetch=debug,safefetch_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/safefetch/safefetch.log`; parent directories are created.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("safefetch")?;
    xdg_dirs
        .place_state_file("safefetch.log")
        .context("create safefetch state dir")
}

/// Install the global subscriber writing to [`log_file_path`].
///
/// Returns Err if the file cannot be opened or a subscriber is already set,
/// so the caller can fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {}", e))?;

    tracing::info!("safefetch logging initialized at {}", path.display());
    Ok(())
}

/// Stderr-only logging. Silently keeps an already-installed subscriber.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
