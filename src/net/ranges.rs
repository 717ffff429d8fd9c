//! Reserved address range classification.
//!
//! # Design Decisions
//! - The range table is a `const` slice, built at compile time and never mutated
//! - Classification runs on canonical addresses, so IPv4-mapped IPv6 input is
//!   already unwrapped by the time it gets here

use std::net::{Ipv4Addr, Ipv6Addr};

use ipnet::{IpNet, Ipv4Net, Ipv6Net};

use super::address::Address;

/// A CIDR block marked as internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedRange {
    pub network: IpNet,
    pub label: &'static str,
}

impl ReservedRange {
    const fn v4(a: u8, b: u8, c: u8, d: u8, prefix_len: u8, label: &'static str) -> Self {
        Self {
            network: IpNet::V4(Ipv4Net::new_assert(Ipv4Addr::new(a, b, c, d), prefix_len)),
            label,
        }
    }

    const fn v6(head: u16, tail: u16, prefix_len: u8, label: &'static str) -> Self {
        Self {
            network: IpNet::V6(Ipv6Net::new_assert(
                Ipv6Addr::new(head, 0, 0, 0, 0, 0, 0, tail),
                prefix_len,
            )),
            label,
        }
    }

    /// Whether `addr` falls inside this block. Families never cross-match.
    pub fn contains(&self, addr: &Address) -> bool {
        self.network.contains(&addr.ip())
    }
}

/// Ranges that classify as private.
pub const RESERVED_RANGES: &[ReservedRange] = &[
    ReservedRange::v4(127, 0, 0, 0, 8, "loopback"),
    ReservedRange::v4(10, 0, 0, 0, 8, "private"),
    ReservedRange::v4(172, 16, 0, 0, 12, "private"),
    ReservedRange::v4(192, 168, 0, 0, 16, "private"),
    ReservedRange::v4(169, 254, 0, 0, 16, "link-local"),
    ReservedRange::v6(0, 1, 128, "loopback"),
    ReservedRange::v6(0xfc00, 0, 7, "unique-local"),
    ReservedRange::v6(0xfe80, 0, 10, "link-local"),
];

/// The reserved range containing `addr`, if any.
pub fn classify(addr: &Address) -> Option<&'static ReservedRange> {
    RESERVED_RANGES.iter().find(|range| range.contains(addr))
}

/// Whether `addr` is loopback, private, unique-local or link-local.
///
/// Total over every address; anything outside the table is public.
pub fn is_private(addr: &Address) -> bool {
    classify(addr).is_some()
}
