//! libcurl transport (one `Easy` handle, reused across hops).

use curl::easy::{Easy, IpResolve, List};

use super::{Transport, TransportError, TransportOption, TransportResponse};
use crate::timeouts::FetchTimeouts;
use crate::url_validator::ValidationResult;

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        // The error buffer text ("Resolving timed out after 1 milliseconds")
        // is more useful than the generic code description.
        let message = e.extra_description().unwrap_or(e.description());
        TransportError::new(message)
    }
}

/// Transport backed by a libcurl easy handle.
///
/// Each target's host is pinned to the addresses the validator resolved
/// (`CURLOPT_RESOLVE`), so libcurl does not perform a second lookup that
/// could answer differently.
pub struct CurlTransport {
    easy: Easy,
    timeouts: FetchTimeouts,
    capture: bool,
}

impl CurlTransport {
    pub fn new(timeouts: FetchTimeouts) -> Result<Self, TransportError> {
        let mut transport = Self {
            easy: Easy::new(),
            timeouts,
            capture: true,
        };
        transport.apply_timeouts()?;
        Ok(transport)
    }

    fn apply_timeouts(&mut self) -> Result<(), TransportError> {
        self.easy.connect_timeout(self.timeouts.connect)?;
        self.easy.timeout(self.timeouts.request)?;
        Ok(())
    }
}

impl Transport for CurlTransport {
    fn set_target(&mut self, target: &ValidationResult) -> Result<(), TransportError> {
        let port = target.effective_port().ok_or_else(|| {
            TransportError::new(format!(
                "no default port for scheme {:?}; refusing to connect without pinned addresses",
                target.scheme
            ))
        })?;
        if target.ips.is_empty() {
            return Err(TransportError::new("no validated addresses to connect to"));
        }

        let addrs = target
            .ips
            .iter()
            .map(|ip| ip.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let mut pins = List::new();
        pins.append(&format!("{}:{}:{}", target.host, port, addrs))?;
        self.easy.resolve(pins)?;
        self.easy.url(&target.normalized_url)?;
        Ok(())
    }

    fn set_option(&mut self, option: TransportOption, enabled: bool) -> Result<(), TransportError> {
        match option {
            TransportOption::Ipv4Only => self.easy.ip_resolve(if enabled {
                IpResolve::V4
            } else {
                IpResolve::Any
            })?,
            TransportOption::NoAutoRedirect => self.easy.follow_location(!enabled)?,
            TransportOption::CaptureFullResponse => self.capture = enabled,
        }
        Ok(())
    }

    fn perform(&mut self) -> Result<TransportResponse, TransportError> {
        let mut headers = Vec::new();
        let mut body = Vec::new();
        let capture = self.capture;

        {
            let mut transfer = self.easy.transfer();
            transfer.header_function(|data| {
                headers.extend_from_slice(data);
                true
            })?;
            transfer.write_function(|data| {
                if capture {
                    body.extend_from_slice(data);
                }
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status_code = self.easy.response_code()?;
        let redirect_target = self.easy.redirect_url()?.map(str::to_string);
        tracing::debug!(
            "curl: HTTP {} ({} header bytes, {} body bytes)",
            status_code,
            headers.len(),
            body.len()
        );

        Ok(TransportResponse {
            status_code,
            headers,
            body,
            redirect_target,
        })
    }

    fn reset(&mut self) {
        self.easy.reset();
        self.capture = true;
        if let Err(e) = self.apply_timeouts() {
            tracing::warn!("curl: failed to restore timeouts after reset: {}", e);
        }
    }
}
