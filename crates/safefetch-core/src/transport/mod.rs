//! HTTP transport interface used by the fetcher.
//!
//! The fetcher drives one hop at a time: point the transport at a validated
//! URL, set options, perform, inspect the status. `CurlTransport` is the
//! libcurl-backed implementation.

mod easy;

use thiserror::Error;

use crate::error::FetchError;
use crate::url_validator::ValidationResult;

pub use easy::CurlTransport;

/// Switches the fetcher sets on the transport before each chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportOption {
    /// Connect over IPv4 only.
    Ipv4Only,
    /// Never follow `Location` on its own; report it instead.
    NoAutoRedirect,
    /// Keep the response body in memory and return it.
    CaptureFullResponse,
}

/// Failure reported by the transport, message as produced by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TransportError> for FetchError {
    fn from(e: TransportError) -> Self {
        FetchError::Transport { message: e.message }
    }
}

/// Outcome of a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    pub status_code: u32,
    /// Raw response header block (status line included).
    pub headers: Vec<u8>,
    pub body: Vec<u8>,
    /// Absolute target of a `Location` header, if the response had one.
    pub redirect_target: Option<String>,
}

/// Capability to perform one HTTP request at a time.
///
/// A transport is owned by a single fetcher and never used by two chains at
/// once.
pub trait Transport {
    /// Points the next request at `target.normalized_url`. Implementations
    /// should connect only to `target.ips`.
    fn set_target(&mut self, target: &ValidationResult) -> Result<(), TransportError>;

    fn set_option(&mut self, option: TransportOption, enabled: bool) -> Result<(), TransportError>;

    fn perform(&mut self) -> Result<TransportResponse, TransportError>;

    /// Drop per-chain state. Called when a chain ends, on every exit path.
    fn reset(&mut self) {}
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn set_target(&mut self, target: &ValidationResult) -> Result<(), TransportError> {
        (**self).set_target(target)
    }

    fn set_option(&mut self, option: TransportOption, enabled: bool) -> Result<(), TransportError> {
        (**self).set_option(option, enabled)
    }

    fn perform(&mut self) -> Result<TransportResponse, TransportError> {
        (**self).perform()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// HTTP statuses that carry a redirect the fetcher may follow.
pub fn is_redirect(status_code: u32) -> bool {
    matches!(status_code, 301 | 302 | 303 | 307 | 308)
}
