//! Redirect-following fetch loop with per-hop validation.
//!
//! Each hop goes `Validating -> Fetching` and then either finishes or, for a
//! followed redirect, starts over with the `Location` target. The target gets
//! exactly the same validation as the original URL, so a public URL cannot
//! redirect into a blocked network. The transport never follows redirects on
//! its own.

mod guard;

use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::error::FetchError;
use crate::transport::{is_redirect, Transport, TransportOption, TransportResponse};
use crate::url_validator::{redact_credentials, UrlValidator, ValidationResult};

use guard::TransportGuard;

/// Redirect and output behaviour of a [`SafeFetcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Follow 301/302/303/307/308 responses. Off by default.
    pub follow_redirects: bool,
    /// Maximum redirects followed per chain when `follow_redirects` is set.
    /// `0` means no limit.
    pub redirect_limit: u32,
    /// Prefix the returned body with the final response's raw headers.
    pub output_headers: bool,
}

/// Final response of a chain plus every URL that was validated on the way.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub status_code: u32,
    pub headers: Vec<u8>,
    pub body: Vec<u8>,
    /// One entry per hop, original URL first.
    pub chain: Vec<ValidationResult>,
}

impl FetchOutcome {
    /// Number of redirects that were followed.
    pub fn redirects(&self) -> usize {
        self.chain.len().saturating_sub(1)
    }

    /// The body, preceded by the raw header block when `with_headers` is set.
    pub fn into_bytes(self, with_headers: bool) -> Vec<u8> {
        if !with_headers {
            return self.body;
        }
        let mut bytes = self.headers;
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

/// Fetches URLs through a transport, validating every hop.
///
/// The fetcher owns its transport; `execute` takes `&mut self`, so a transport
/// is never shared by two chains. The validator is shared via `Arc`.
pub struct SafeFetcher<T: Transport> {
    transport: T,
    validator: Arc<UrlValidator>,
    options: FetchOptions,
    cancel: Option<CancelToken>,
}

impl<T: Transport> SafeFetcher<T> {
    pub fn new(transport: T, validator: Arc<UrlValidator>) -> Self {
        Self {
            transport,
            validator,
            options: FetchOptions::default(),
            cancel: None,
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Stop the chain at the next hop boundary once `token` is cancelled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut FetchOptions {
        &mut self.options
    }

    pub fn validator(&self) -> &UrlValidator {
        &self.validator
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches `url` and returns the response bytes (headers first when
    /// `output_headers` is set).
    ///
    /// # Errors
    ///
    /// `InvalidUrl` if the URL or any redirect target fails validation,
    /// `Transport` if a request fails, `RedirectLimitExceeded` when the chain
    /// is longer than `redirect_limit`, `Cancelled` if the token fired.
    pub fn execute(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        let output_headers = self.options.output_headers;
        Ok(self.fetch(url)?.into_bytes(output_headers))
    }

    /// Like [`execute`](Self::execute) but returns the status, headers and
    /// validated chain alongside the body.
    pub fn fetch(&mut self, url: &str) -> Result<FetchOutcome, FetchError> {
        let Self {
            transport,
            validator,
            options,
            cancel,
        } = self;

        let mut transport = TransportGuard::new(transport);
        transport.set_option(TransportOption::Ipv4Only, true)?;
        transport.set_option(TransportOption::NoAutoRedirect, true)?;
        transport.set_option(TransportOption::CaptureFullResponse, true)?;

        let mut current = url.to_string();
        let mut redirects = 0u32;
        let mut chain = Vec::new();

        loop {
            if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                tracing::debug!("fetch cancelled before {}", redact_credentials(&current));
                return Err(FetchError::Cancelled);
            }

            let validated = validator.validate(&current).map_err(|reason| {
                if !chain.is_empty() {
                    tracing::warn!("redirect to {:?} rejected: {}", redact_credentials(&current), reason);
                }
                FetchError::from(reason)
            })?;
            tracing::debug!("hop {}: fetching {}", chain.len(), validated.redacted_url());

            transport.set_target(&validated)?;
            let response = transport.perform()?;
            chain.push(validated);

            if !options.follow_redirects || !is_redirect(response.status_code) {
                return Ok(finish(response, chain));
            }

            if options.redirect_limit != 0 {
                redirects += 1;
                if redirects > options.redirect_limit {
                    tracing::debug!("redirect limit {} exceeded", options.redirect_limit);
                    return Err(FetchError::RedirectLimitExceeded);
                }
            }

            // No Location: the next hop sees an empty URL and fails validation.
            current = response.redirect_target.unwrap_or_default();
            tracing::debug!("HTTP {} -> {:?}", response.status_code, redact_credentials(&current));
        }
    }
}

fn finish(response: TransportResponse, chain: Vec<ValidationResult>) -> FetchOutcome {
    FetchOutcome {
        status_code: response.status_code,
        headers: response.headers,
        body: response.body,
        chain,
    }
}

#[cfg(test)]
mod tests;
