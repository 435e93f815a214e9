//! Conversions between IPv4 addresses and the u32 range-lookup key.

use std::net::{IpAddr, Ipv4Addr};

/// Big-endian integer form of an IPv4 address. IPv6-mapped IPv4 input
/// (`::ffff:a.b.c.d`) takes the low 4 bytes; any other IPv6 address has no
/// integer form and yields `None`.
pub fn address_to_integer(addr: IpAddr) -> Option<u32> {
    match addr {
        IpAddr::V4(v4) => Some(u32::from(v4)),
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(u32::from),
    }
}

/// Inverse of [`address_to_integer`]. Total: every u32 is a dotted quad.
pub fn integer_to_address(n: u32) -> Ipv4Addr {
    Ipv4Addr::from(n)
}
