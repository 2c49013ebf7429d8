//! IPv4 literal / CIDR matching.

use std::net::Ipv4Addr;

/// Does `ip` match `entry`?
///
/// An entry without `/` is compared for equality. `subnet/bits` matches when
/// `ip & netmask == subnet`; the subnet is not masked first, so an entry like
/// `10.0.0.1/8` never matches. `/0` masks every bit. Entries that do not parse
/// (including IPv6 and masks above 32) never match.
pub fn cidr_match(ip: Ipv4Addr, entry: &str) -> bool {
    let Some((subnet, bits)) = entry.split_once('/') else {
        return entry.trim().parse::<Ipv4Addr>() == Ok(ip);
    };
    let (Ok(subnet), Ok(bits)) = (subnet.trim().parse::<Ipv4Addr>(), bits.trim().parse::<u32>()) else {
        return false;
    };
    if bits > 32 {
        return false;
    }
    // (1 << (32 - bits)) - 1, without overflowing at bits == 0.
    let host_bits = u32::MAX.checked_shr(bits).unwrap_or(0);
    u32::from(ip) & !host_bits == u32::from(subnet)
}

/// True if any address matches any entry.
pub(crate) fn any_match(ips: &[Ipv4Addr], entries: &[String]) -> bool {
    entries
        .iter()
        .any(|entry| ips.iter().any(|ip| cidr_match(*ip, entry)))
}
