//! `safefetch fetch` – validate, fetch and print (or save) the response.

use anyhow::{Context, Result};
use safefetch_core::config::SafeFetchConfig;
use safefetch_core::{redact_credentials, CurlTransport, SafeFetcher};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

pub struct FetchArgs {
    pub url: String,
    pub output: Option<PathBuf>,
}

pub fn run_fetch(cfg: &SafeFetchConfig, args: &FetchArgs) -> Result<()> {
    let timeouts = cfg.timeouts.to_timeouts()?;
    let validator = Arc::new(cfg.build_validator()?);
    let transport = CurlTransport::new(timeouts).context("init curl handle")?;
    let mut fetcher = SafeFetcher::new(transport, validator).with_options(cfg.fetch_options());

    let shown_url = redact_credentials(&args.url);
    let outcome = fetcher
        .fetch(&args.url)
        .with_context(|| format!("fetch {}", shown_url))?;
    tracing::info!(
        "fetched {} -> HTTP {} after {} redirect(s), {} bytes",
        shown_url,
        outcome.status_code,
        outcome.redirects(),
        outcome.body.len()
    );

    let bytes = outcome.into_bytes(cfg.output_headers);

    match &args.output {
        Some(path) => {
            std::fs::write(path, &bytes).with_context(|| format!("write {}", path.display()))?;
            println!("Saved {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes).context("write stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
