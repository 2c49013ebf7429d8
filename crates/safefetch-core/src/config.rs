use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dns::SystemResolver;
use crate::fetcher::FetchOptions;
use crate::parts_list::PartsList;
use crate::timeouts::FetchTimeouts;
use crate::url_validator::{default_blacklist, default_whitelist, UrlValidator};

/// One policy list as written in config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartsListConfig {
    /// Host name regular expressions (matched against the whole host).
    pub hosts: Vec<String>,
    /// IPv4 addresses or CIDR ranges.
    pub ips: Vec<String>,
    pub ports: Vec<u16>,
    pub schemes: Vec<String>,
}

impl From<&PartsListConfig> for PartsList {
    fn from(cfg: &PartsListConfig) -> Self {
        PartsList::new(&cfg.hosts, &cfg.ips, cfg.ports.iter().copied(), &cfg.schemes)
    }
}

impl From<&PartsList> for PartsListConfig {
    fn from(list: &PartsList) -> Self {
        Self {
            hosts: list.hosts().to_vec(),
            ips: list.ips().to_vec(),
            ports: list.ports().to_vec(),
            schemes: list.schemes().to_vec(),
        }
    }
}

/// Timeouts in seconds (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Host name resolution during validation.
    pub dns_secs: f64,
    /// TCP + TLS connect.
    pub connect_secs: f64,
    /// Whole request, per hop.
    pub request_secs: f64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            dns_secs: 5.0,
            connect_secs: 15.0,
            request_secs: 30.0,
        }
    }
}

impl TimeoutsConfig {
    pub fn to_timeouts(&self) -> Result<FetchTimeouts> {
        let secs = |name: &str, v: f64| {
            Duration::try_from_secs_f64(v).with_context(|| format!("invalid timeouts.{name}: {v}"))
        };
        Ok(FetchTimeouts::new(
            secs("dns_secs", self.dns_secs)?,
            secs("connect_secs", self.connect_secs)?,
            secs("request_secs", self.request_secs)?,
        ))
    }
}

/// Global configuration loaded from `~/.config/safefetch/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafeFetchConfig {
    /// Accept `user:password@` in URLs.
    #[serde(default)]
    pub credentials_allowed: bool,
    /// Follow HTTP redirects (each target is validated again).
    #[serde(default)]
    pub follow_redirects: bool,
    /// Maximum redirects per fetch; 0 = unlimited.
    #[serde(default)]
    pub redirect_limit: u32,
    /// Include response headers in fetched output.
    #[serde(default)]
    pub output_headers: bool,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    /// Allow-list; if missing, http/https on ports 80, 443, 8080.
    #[serde(default)]
    pub whitelist: Option<PartsListConfig>,
    /// Deny-list; if missing, reserved and private IPv4 ranges.
    #[serde(default)]
    pub blacklist: Option<PartsListConfig>,
}

impl SafeFetchConfig {
    pub fn effective_whitelist(&self) -> PartsList {
        self.whitelist
            .as_ref()
            .map(PartsList::from)
            .unwrap_or_else(default_whitelist)
    }

    pub fn effective_blacklist(&self) -> PartsList {
        self.blacklist
            .as_ref()
            .map(PartsList::from)
            .unwrap_or_else(default_blacklist)
    }

    /// Copy with the built-in lists written out, for display.
    pub fn resolved(&self) -> Self {
        let mut cfg = self.clone();
        cfg.whitelist = Some(PartsListConfig::from(&self.effective_whitelist()));
        cfg.blacklist = Some(PartsListConfig::from(&self.effective_blacklist()));
        cfg
    }

    /// Validator using the system resolver bounded by `timeouts.dns_secs`.
    pub fn build_validator(&self) -> Result<UrlValidator> {
        let timeouts = self.timeouts.to_timeouts()?;
        Ok(UrlValidator::new(
            self.effective_blacklist(),
            self.effective_whitelist(),
            SystemResolver::new(timeouts.dns),
        )
        .credentials_allowed(self.credentials_allowed))
    }

    /// Pretty TOML, as written by `load_or_init`.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            follow_redirects: self.follow_redirects,
            redirect_limit: self.redirect_limit,
            output_headers: self.output_headers,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("safefetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SafeFetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SafeFetchConfig::default();
        let toml = default_cfg.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<SafeFetchConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SafeFetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
