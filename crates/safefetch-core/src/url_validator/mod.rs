//! URL validation against a whitelist/blacklist pair.
//!
//! A URL is accepted only if its scheme, explicit port, host name and every
//! address the host resolves to pass both lists. Whitelist fields that are
//! empty do not restrict; blacklist matches always reject, and are checked
//! after the whitelist for each part.
//!
//! Check order: credentials, scheme, port, host, resolved addresses. The first
//! failing check decides the reported [`InvalidUrlReason`].

mod cidr;
mod defaults;
mod host_pattern;
mod parse;
mod redact;

use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::dns::DnsResolver;
use crate::error::InvalidUrlReason;
use crate::parts_list::PartsList;

use host_pattern::HostPatterns;
use parse::{parse_url, ParsedUrl};

pub use cidr::cidr_match;
pub use redact::redact_credentials;
pub use defaults::{
    default_blacklist, default_whitelist, DEFAULT_BLACKLIST_IPS, DEFAULT_WHITELIST_PORTS,
    DEFAULT_WHITELIST_SCHEMES,
};

/// A URL that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Rebuilt URL: lower-cased scheme and host, other parts as given.
    pub normalized_url: String,
    /// Lower-cased scheme (`http` when the URL had none).
    pub scheme: String,
    /// Lower-cased host.
    pub host: String,
    /// Port, only if the URL spelled one out.
    pub port: Option<u16>,
    /// Every IPv4 address the host resolved to, in resolver order. Never empty.
    pub ips: Vec<Ipv4Addr>,
}

impl ValidationResult {
    /// Explicit port, or the well-known port of the scheme.
    ///
    /// `None` only for schemes with no known default; such a target cannot be
    /// pinned to `ips` and transports must refuse it.
    pub fn effective_port(&self) -> Option<u16> {
        self.port.or_else(|| default_port(&self.scheme))
    }

    /// `normalized_url` with any `user:password@` masked, for logging.
    pub fn redacted_url(&self) -> std::borrow::Cow<'_, str> {
        redact_credentials(&self.normalized_url)
    }
}

/// Default ports of the URL schemes libcurl can speak.
fn default_port(scheme: &str) -> Option<u16> {
    let port = match scheme {
        "http" | "ws" => 80,
        "https" | "wss" => 443,
        "ftp" => 21,
        "ftps" => 990,
        "sftp" | "scp" => 22,
        "telnet" => 23,
        "smtp" => 25,
        "smtps" => 465,
        "tftp" => 69,
        "gopher" | "gophers" => 70,
        "pop3" => 110,
        "pop3s" => 995,
        "imap" => 143,
        "imaps" => 993,
        "ldap" => 389,
        "ldaps" => 636,
        "smb" | "smbs" => 445,
        "rtsp" => 554,
        "mqtt" => 1883,
        "dict" => 2628,
        _ => return None,
    };
    Some(port)
}

/// Validates URLs against SSRF policy.
///
/// Configuration is fixed at construction, so one validator can be shared
/// (e.g. behind an `Arc`) by any number of threads.
pub struct UrlValidator {
    blacklist: PartsList,
    whitelist: PartsList,
    blacklist_hosts: HostPatterns,
    whitelist_hosts: HostPatterns,
    credentials_allowed: bool,
    resolver: Box<dyn DnsResolver>,
}

impl fmt::Debug for UrlValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlValidator")
            .field("blacklist", &self.blacklist)
            .field("whitelist", &self.whitelist)
            .field("credentials_allowed", &self.credentials_allowed)
            .finish_non_exhaustive()
    }
}

impl UrlValidator {
    pub fn new(blacklist: PartsList, whitelist: PartsList, resolver: impl DnsResolver + 'static) -> Self {
        Self {
            blacklist_hosts: HostPatterns::compile(blacklist.hosts()),
            whitelist_hosts: HostPatterns::compile(whitelist.hosts()),
            blacklist,
            whitelist,
            credentials_allowed: false,
            resolver: Box::new(resolver),
        }
    }

    /// Default blacklist (reserved IPv4 ranges) and whitelist (http/https on 80, 443, 8080).
    pub fn with_default_policy(resolver: impl DnsResolver + 'static) -> Self {
        Self::new(default_blacklist(), default_whitelist(), resolver)
    }

    /// Allow `user:password@` in URLs. Off by default.
    pub fn credentials_allowed(mut self, allowed: bool) -> Self {
        self.credentials_allowed = allowed;
        self
    }

    pub fn are_credentials_allowed(&self) -> bool {
        self.credentials_allowed
    }

    pub fn blacklist(&self) -> &PartsList {
        &self.blacklist
    }

    pub fn whitelist(&self) -> &PartsList {
        &self.whitelist
    }

    /// Validates `raw_url` and resolves its host.
    ///
    /// # Errors
    ///
    /// Returns the first policy violation found; see the module docs for the
    /// order of checks.
    pub fn validate(&self, raw_url: &str) -> Result<ValidationResult, InvalidUrlReason> {
        if raw_url.trim().is_empty() {
            return Err(InvalidUrlReason::EmptyUrl);
        }

        let parsed = parse_url(raw_url)?;
        let Some(raw_host) = parsed.host.as_deref() else {
            return Err(InvalidUrlReason::NoHost);
        };

        if !self.credentials_allowed && parsed.has_credentials() {
            return Err(InvalidUrlReason::CredentialsNotAllowed);
        }

        // Scheme-less input is fetched as http, so it is checked as http.
        let scheme = self.validate_scheme(parsed.scheme.as_deref().unwrap_or("http"))?;

        if let Some(port) = parsed.port {
            self.validate_port(port)?;
        }

        let host = raw_host.to_ascii_lowercase();
        self.validate_host_name(&host)?;
        let ips = self.resolve_and_check(&host)?;

        let normalized_url = build_url(&parsed, &scheme, &host);
        tracing::debug!(
            "validated {} ({} -> {:?})",
            redact_credentials(&normalized_url),
            host,
            ips
        );

        Ok(ValidationResult {
            normalized_url,
            scheme,
            host,
            port: parsed.port,
            ips,
        })
    }

    fn validate_scheme(&self, scheme: &str) -> Result<String, InvalidUrlReason> {
        let scheme = scheme.to_ascii_lowercase();
        let listed = |list: &[String]| list.iter().any(|s| s.eq_ignore_ascii_case(&scheme));

        let whitelisted = self.whitelist.schemes();
        if !whitelisted.is_empty() && !listed(whitelisted) {
            return Err(InvalidUrlReason::SchemeNotWhitelisted);
        }
        if listed(self.blacklist.schemes()) {
            return Err(InvalidUrlReason::SchemeBlacklisted);
        }
        Ok(scheme)
    }

    fn validate_port(&self, port: u16) -> Result<(), InvalidUrlReason> {
        let whitelisted = self.whitelist.ports();
        if !whitelisted.is_empty() && !whitelisted.contains(&port) {
            return Err(InvalidUrlReason::PortNotWhitelisted);
        }
        if self.blacklist.ports().contains(&port) {
            return Err(InvalidUrlReason::PortBlacklisted);
        }
        Ok(())
    }

    fn validate_host_name(&self, host: &str) -> Result<(), InvalidUrlReason> {
        if !self.whitelist_hosts.is_empty() && !self.whitelist_hosts.matches(host) {
            return Err(InvalidUrlReason::HostNotWhitelisted);
        }
        if self.blacklist_hosts.matches(host) {
            return Err(InvalidUrlReason::HostBlacklisted);
        }
        Ok(())
    }

    fn resolve_and_check(&self, host: &str) -> Result<Vec<Ipv4Addr>, InvalidUrlReason> {
        let ips = match self.resolver.resolve(host) {
            Ok(ips) if !ips.is_empty() => ips,
            Ok(_) => {
                tracing::debug!("{} has no IPv4 address", host);
                return Err(InvalidUrlReason::UnresolvableHost);
            }
            Err(e) => {
                tracing::debug!("{}", e);
                return Err(InvalidUrlReason::UnresolvableHost);
            }
        };

        let whitelisted = self.whitelist.ips();
        if !whitelisted.is_empty() && !cidr::any_match(&ips, whitelisted) {
            return Err(InvalidUrlReason::IpNotWhitelisted);
        }
        if cidr::any_match(&ips, self.blacklist.ips()) {
            return Err(InvalidUrlReason::IpBlacklisted);
        }
        Ok(ips)
    }
}

/// `scheme://[user[:password]@]host[:port][path][?query][#fragment]`; empty parts are omitted.
fn build_url(parts: &ParsedUrl, scheme: &str, host: &str) -> String {
    let user = parts.user.as_deref().filter(|u| !u.is_empty());
    let password = parts.password.as_deref().filter(|p| !p.is_empty());

    let mut url = format!("{scheme}://");
    if let Some(user) = user {
        url.push_str(user);
    }
    if let Some(password) = password {
        url.push(':');
        url.push_str(password);
    }
    if user.is_some() || password.is_some() {
        url.push('@');
    }
    url.push_str(host);
    if let Some(port) = parts.port {
        url.push_str(&format!(":{port}"));
    }
    if let Some(path) = &parts.path {
        url.push_str(path);
    }
    if let Some(query) = &parts.query {
        url.push('?');
        url.push_str(query);
    }
    if let Some(fragment) = &parts.fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}
