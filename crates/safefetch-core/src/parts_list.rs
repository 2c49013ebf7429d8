//! Ordered, de-duplicated URL part values used as a whitelist or blacklist.
//!
//! Values are stored as given (after trimming) and only interpreted by the
//! validator: hosts as regular expressions, IPs as literals or CIDR ranges.

/// One side of a policy: hosts, IPs, ports and schemes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartsList {
    hosts: Vec<String>,
    ips: Vec<String>,
    ports: Vec<u16>,
    schemes: Vec<String>,
}

impl PartsList {
    /// Builds a list from the four value sets; duplicates are dropped.
    pub fn new<H, I, S>(hosts: H, ips: I, ports: impl IntoIterator<Item = u16>, schemes: S) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let mut list = Self::default();
        list.set_hosts(hosts);
        list.set_ips(ips);
        list.set_ports(ports);
        list.set_schemes(schemes);
        list
    }

    /// Adds a host pattern.
    ///
    /// The pattern is a regular expression matched case-insensitively against
    /// the whole host name (`^(?:pattern)$`), so `.` matches any character
    /// unless escaped: use `(.*)\.example\.com`, not `*.example.com`.
    pub fn add_host(&mut self, host: impl AsRef<str>) {
        insert_str(&mut self.hosts, host.as_ref());
    }

    /// Adds an IPv4 address or an IPv4 CIDR range (`10.0.0.0/8`).
    pub fn add_ip(&mut self, ip: impl AsRef<str>) {
        insert_str(&mut self.ips, ip.as_ref());
    }

    pub fn add_port(&mut self, port: u16) {
        if !self.ports.contains(&port) {
            self.ports.push(port);
        }
    }

    pub fn add_scheme(&mut self, scheme: impl AsRef<str>) {
        insert_str(&mut self.schemes, scheme.as_ref());
    }

    pub fn set_hosts<I>(&mut self, hosts: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.hosts.clear();
        for host in hosts {
            self.add_host(host);
        }
    }

    pub fn set_ips<I>(&mut self, ips: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ips.clear();
        for ip in ips {
            self.add_ip(ip);
        }
    }

    pub fn set_ports(&mut self, ports: impl IntoIterator<Item = u16>) {
        self.ports.clear();
        for port in ports {
            self.add_port(port);
        }
    }

    pub fn set_schemes<I>(&mut self, schemes: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.schemes.clear();
        for scheme in schemes {
            self.add_scheme(scheme);
        }
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn ips(&self) -> &[String] {
        &self.ips
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }
}

fn insert_str(destination: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !destination.iter().any(|v| v == value) {
        destination.push(value.to_string());
    }
}
