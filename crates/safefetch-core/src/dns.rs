//! DNS resolver interface used by the URL validator.
//!
//! The validator only depends on this trait. `SystemResolver` uses the
//! platform resolver (getaddrinfo) bounded by an explicit timeout;
//! `StaticResolver` answers from a fixed table.

use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use thiserror::Error;

/// Why a host name produced no usable address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("DNS lookup for {host} timed out after {timeout:?}")]
    Timeout { host: String, timeout: Duration },
    #[error("DNS lookup for {host} failed: {message}")]
    Lookup { host: String, message: String },
    #[error("DNS lookup for {host} refused: {limit} lookups already pending")]
    TooManyPending { host: String, limit: usize },
}

/// Resolves a host name to IPv4 addresses.
///
/// Implementations return addresses in resolver order without duplicates. An
/// empty vector means the name exists but has no IPv4 address.
pub trait DnsResolver: Send + Sync {
    fn resolve(&self, host: &str) -> Result<Vec<Ipv4Addr>, ResolveError>;
}

/// Lookups a [`SystemResolver`] lets run at once, abandoned ones included.
pub const DEFAULT_MAX_PENDING_LOOKUPS: usize = 32;

/// Platform resolver with a hard timeout.
///
/// getaddrinfo cannot be interrupted, so each lookup runs on its own thread
/// and is abandoned (not cancelled) when the timeout elapses. An abandoned
/// thread lives until getaddrinfo returns. At most `max_pending` lookups may
/// be outstanding per resolver (clones share the count); further calls fail
/// with [`ResolveError::TooManyPending`] until threads finish.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    timeout: Duration,
    max_pending: usize,
    pending: Arc<AtomicUsize>,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            max_pending: DEFAULT_MAX_PENDING_LOOKUPS,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Lookup threads still running, including timed-out ones.
    pub fn pending_lookups(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

impl DnsResolver for SystemResolver {
    fn resolve(&self, host: &str) -> Result<Vec<Ipv4Addr>, ResolveError> {
        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return Ok(vec![ip]);
        }
        // Bracketed IPv6 literal: no IPv4 address by definition.
        if host.starts_with('[') {
            return Ok(Vec::new());
        }

        lookup_with_timeout(host, self.timeout, &self.pending, self.max_pending, |name| {
            (name, 0u16)
                .to_socket_addrs()
                .map(|addrs| addrs.map(|a| a.ip()).collect())
        })
    }
}

/// Runs `lookup` on a helper thread and waits at most `timeout` for it.
///
/// `pending` counts helper threads still running; it is incremented here and
/// decremented by the thread when `lookup` returns.
pub(crate) fn lookup_with_timeout<F>(
    host: &str,
    timeout: Duration,
    pending: &Arc<AtomicUsize>,
    max_pending: usize,
    lookup: F,
) -> Result<Vec<Ipv4Addr>, ResolveError>
where
    F: FnOnce(&str) -> io::Result<Vec<IpAddr>> + Send + 'static,
{
    if pending.fetch_add(1, Ordering::SeqCst) >= max_pending {
        pending.fetch_sub(1, Ordering::SeqCst);
        return Err(ResolveError::TooManyPending {
            host: host.to_string(),
            limit: max_pending,
        });
    }

    let (tx, rx) = mpsc::channel();
    let name = host.to_string();
    let counter = Arc::clone(pending);
    thread::spawn(move || {
        let result = lookup(&name);
        counter.fetch_sub(1, Ordering::SeqCst);
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(addrs)) => Ok(ipv4_unique(addrs)),
        Ok(Err(e)) => Err(ResolveError::Lookup {
            host: host.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Err(ResolveError::Timeout {
            host: host.to_string(),
            timeout,
        }),
    }
}

/// Fixed host table, matched case-insensitively. Unknown names fail to resolve.
///
/// IPv4 literals resolve to themselves, like the system resolver.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    hosts: HashMap<String, Vec<Ipv4Addr>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the addresses for `host`.
    pub fn with_host(mut self, host: &str, ips: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        self.hosts.insert(host.to_ascii_lowercase(), ips.into_iter().collect());
        self
    }
}

impl DnsResolver for StaticResolver {
    fn resolve(&self, host: &str) -> Result<Vec<Ipv4Addr>, ResolveError> {
        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return Ok(vec![ip]);
        }
        self.hosts
            .get(&host.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| ResolveError::Lookup {
                host: host.to_string(),
                message: "unknown host".to_string(),
            })
    }
}

fn ipv4_unique(addrs: Vec<IpAddr>) -> Vec<Ipv4Addr> {
    let mut out = Vec::new();
    for addr in addrs {
        if let IpAddr::V4(v4) = addr {
            if !out.contains(&v4) {
                out.push(v4);
            }
        }
    }
    out
}
