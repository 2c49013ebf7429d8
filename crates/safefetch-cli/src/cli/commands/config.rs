//! `safefetch config` – print file locations and effective settings.

use anyhow::Result;
use safefetch_core::config::{self, SafeFetchConfig};
use safefetch_core::logging;

pub fn run_config(cfg: &SafeFetchConfig) -> Result<()> {
    println!("# config: {}", config::config_path()?.display());
    println!("# log:    {}", logging::log_file_path()?.display());
    print!("{}", cfg.resolved().to_toml()?);
    Ok(())
}
