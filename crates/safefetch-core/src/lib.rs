//! SSRF-guarded URL validation and redirect-following fetching.
//!
//! [`UrlValidator`] decides whether a URL may be dereferenced at all: scheme,
//! explicit port, host name and every resolved IPv4 address are checked
//! against a whitelist and a blacklist ([`PartsList`]). [`SafeFetcher`] runs
//! the request through a [`Transport`] and re-validates every redirect target
//! before following it.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use safefetch_core::{CurlTransport, FetchOptions, FetchTimeouts, SafeFetcher, SystemResolver, UrlValidator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let timeouts = FetchTimeouts::new(Duration::from_secs(5), Duration::from_secs(10), Duration::from_secs(30));
//! let validator = Arc::new(UrlValidator::with_default_policy(SystemResolver::new(timeouts.dns)));
//! let mut fetcher = SafeFetcher::new(CurlTransport::new(timeouts)?, validator).with_options(FetchOptions {
//!     follow_redirects: true,
//!     redirect_limit: 5,
//!     output_headers: false,
//! });
//! let body = fetcher.execute("https://www.example.com/")?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod config;
pub mod dns;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod parts_list;
pub mod timeouts;
pub mod transport;
pub mod url_validator;

pub use cancel::CancelToken;
pub use dns::{DnsResolver, ResolveError, StaticResolver, SystemResolver};
pub use error::{FetchError, InvalidUrlReason};
pub use fetcher::{FetchOptions, FetchOutcome, SafeFetcher};
pub use parts_list::PartsList;
pub use timeouts::FetchTimeouts;
pub use transport::{CurlTransport, Transport, TransportError, TransportOption, TransportResponse};
pub use url_validator::{redact_credentials, UrlValidator, ValidationResult};
