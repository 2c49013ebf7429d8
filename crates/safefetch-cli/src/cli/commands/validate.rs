//! `safefetch validate` – run the policy checks only.

use anyhow::{bail, Result};
use safefetch_core::config::SafeFetchConfig;

pub fn run_validate(cfg: &SafeFetchConfig, url: &str, json: bool) -> Result<()> {
    let validator = cfg.build_validator()?;
    match validator.validate(url) {
        Ok(result) if json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Ok(result) => {
            let ips: Vec<String> = result.ips.iter().map(|ip| ip.to_string()).collect();
            println!("OK    {}", result.normalized_url);
            println!("{:<6}{}", "HOST", result.host);
            println!("{:<6}{}", "IPS", ips.join(", "));
        }
        Err(reason) if json => {
            let value = serde_json::json!({ "url": url, "error": reason.to_string() });
            println!("{}", serde_json::to_string_pretty(&value)?);
            bail!("{}", reason);
        }
        Err(reason) => bail!("{}: {}", url, reason),
    }
    Ok(())
}
