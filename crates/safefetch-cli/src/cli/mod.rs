//! CLI for the safefetch SSRF-guarded fetcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use safefetch_core::config;
use std::path::PathBuf;

use commands::{run_config, run_fetch, run_validate, FetchArgs};

/// Top-level CLI for safefetch.
#[derive(Debug, Parser)]
#[command(name = "safefetch")]
#[command(about = "safefetch: fetch URLs without reaching internal networks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a URL after validating it (and every redirect target).
    Fetch {
        /// URL to fetch.
        url: String,

        /// Follow HTTP redirects, validating each target.
        #[arg(long)]
        follow_redirects: bool,

        /// Maximum redirects to follow (0 = unlimited). Overrides config.
        #[arg(long, value_name = "N")]
        redirect_limit: Option<u32>,

        /// Accept user:password@ in URLs.
        #[arg(long)]
        allow_credentials: bool,

        /// Write the final response headers before the body.
        #[arg(long)]
        include_headers: bool,

        /// Write the response to FILE instead of stdout.
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Check a URL against the policy without fetching it.
    Validate {
        /// URL to check.
        url: String,

        /// Accept user:password@ in URLs.
        #[arg(long)]
        allow_credentials: bool,

        /// Print the validation result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the config file path and the effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                url,
                follow_redirects,
                redirect_limit,
                allow_credentials,
                include_headers,
                output,
            } => {
                cfg.follow_redirects |= follow_redirects;
                cfg.credentials_allowed |= allow_credentials;
                cfg.output_headers |= include_headers;
                if let Some(limit) = redirect_limit {
                    cfg.redirect_limit = limit;
                }
                run_fetch(&cfg, &FetchArgs { url, output })?;
            }
            CliCommand::Validate {
                url,
                allow_credentials,
                json,
            } => {
                cfg.credentials_allowed |= allow_credentials;
                run_validate(&cfg, &url, json)?;
            }
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
