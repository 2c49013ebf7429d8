//! Error taxonomy for validation and fetching.
//!
//! Every variant is terminal for the call that produced it; nothing in the
//! core retries or falls back.

use thiserror::Error;

/// Why a URL was refused by [`UrlValidator`](crate::url_validator::UrlValidator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InvalidUrlReason {
    #[error("URL cannot be empty.")]
    EmptyUrl,
    #[error("Unable to parse URL.")]
    Unparseable,
    #[error("No host found in URL.")]
    NoHost,
    #[error("Credentials not allowed as part of the URL.")]
    CredentialsNotAllowed,
    #[error("Scheme is not whitelisted.")]
    SchemeNotWhitelisted,
    #[error("Scheme is blacklisted.")]
    SchemeBlacklisted,
    #[error("Port is not whitelisted.")]
    PortNotWhitelisted,
    #[error("Port is blacklisted.")]
    PortBlacklisted,
    #[error("Host is not whitelisted.")]
    HostNotWhitelisted,
    #[error("Host is blacklisted.")]
    HostBlacklisted,
    #[error("Unable to resolve host.")]
    UnresolvableHost,
    #[error("Host does not resolve to a whitelisted address.")]
    IpNotWhitelisted,
    #[error("Host resolves to a blacklisted address.")]
    IpBlacklisted,
}

/// Failure of a validation or of a whole fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The URL (original or a redirect target) violated the policy.
    #[error("invalid URL: {reason}")]
    InvalidUrl { reason: InvalidUrlReason },

    /// The transport failed (connect, DNS, TLS, timeout). Message is verbatim.
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("Redirect limit exceeded.")]
    RedirectLimitExceeded,

    /// A cancel token fired between hops.
    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// The policy reason, if this is an `InvalidUrl` failure.
    pub fn reason(&self) -> Option<InvalidUrlReason> {
        match self {
            FetchError::InvalidUrl { reason } => Some(*reason),
            _ => None,
        }
    }
}

impl From<InvalidUrlReason> for FetchError {
    fn from(reason: InvalidUrlReason) -> Self {
        FetchError::InvalidUrl { reason }
    }
}
