//! Built-in policy tables.

use crate::parts_list::PartsList;

/// Reserved, private and special-purpose IPv4 ranges.
pub static DEFAULT_BLACKLIST_IPS: &[&str] = &[
    "0.0.0.0/8",
    "10.0.0.0/8",
    "100.64.0.0/10",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "172.16.0.0/12",
    "192.0.0.0/29",
    "192.0.2.0/24",
    "192.88.99.0/24",
    "192.168.0.0/16",
    "198.18.0.0/15",
    "198.51.100.0/24",
    "203.0.113.0/24",
    "224.0.0.0/4",
    "240.0.0.0/4",
];

pub static DEFAULT_WHITELIST_PORTS: &[u16] = &[80, 443, 8080];

pub static DEFAULT_WHITELIST_SCHEMES: &[&str] = &["http", "https"];

/// Blocks every range in [`DEFAULT_BLACKLIST_IPS`]; nothing else.
pub fn default_blacklist() -> PartsList {
    let mut list = PartsList::default();
    list.set_ips(DEFAULT_BLACKLIST_IPS.iter().copied());
    list
}

/// http/https on ports 80, 443 and 8080; any host or address.
pub fn default_whitelist() -> PartsList {
    let mut list = PartsList::default();
    list.set_ports(DEFAULT_WHITELIST_PORTS.iter().copied());
    list.set_schemes(DEFAULT_WHITELIST_SCHEMES.iter().copied());
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lists_hold_the_tables() {
        let black = default_blacklist();
        assert_eq!(black.ips().len(), DEFAULT_BLACKLIST_IPS.len());
        assert!(black.hosts().is_empty() && black.ports().is_empty() && black.schemes().is_empty());

        let white = default_whitelist();
        assert_eq!(white.ports(), [80, 443, 8080]);
        assert_eq!(white.schemes(), ["http", "https"]);
        assert!(white.hosts().is_empty() && white.ips().is_empty());
    }
}
