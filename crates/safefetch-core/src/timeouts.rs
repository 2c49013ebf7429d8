use std::time::Duration;

/// Upper bounds for one hop: name resolution, TCP/TLS connect, whole request.
///
/// There are no implicit defaults in the core; callers pick these (the config
/// layer supplies its own).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTimeouts {
    pub dns: Duration,
    pub connect: Duration,
    pub request: Duration,
}

impl FetchTimeouts {
    pub fn new(dns: Duration, connect: Duration, request: Duration) -> Self {
        Self {
            dns,
            connect,
            request,
        }
    }
}
