//! Address parsing and canonical rendering.
//!
//! # Responsibilities
//! - Parse `host:port`, `[v6host]:port` or a bare host into an [`Address`]
//! - Discard the port once the host has been isolated
//! - Collapse IPv4-mapped IPv6 (`::ffff:a.b.c.d`) into plain IPv4
//!
//! # Design Decisions
//! - `Address` wraps `std::net::IpAddr`, so the v4/v6 split is a tagged
//!   variant and equality is equality of the canonical octets
//! - `PeerAddress` keeps the caller's spelling next to the canonical value;
//!   the transport address is rendered back exactly as it was supplied

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors produced while parsing address text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing left after trimming whitespace.
    #[error("empty address")]
    Empty,

    /// A `[` without a matching `]`.
    #[error("unterminated IPv6 bracket in {0:?}")]
    UnclosedBracket(String),

    /// The host part is not an IPv4 or IPv6 literal.
    #[error("invalid IP literal {0:?}")]
    InvalidHost(String),

    /// Something other than a port followed the host.
    #[error("invalid port in {0:?}")]
    InvalidPort(String),
}

/// Address family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

/// A canonical IP address.
///
/// Never holds an IPv4-mapped IPv6 value; those are unwrapped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(IpAddr);

impl Address {
    /// Parse address text, tolerating an optional port and surrounding whitespace.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        split_host(text).map(|(_, ip)| Self::from(ip))
    }

    pub fn family(&self) -> Family {
        match self.0 {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }

    /// The canonical `IpAddr`.
    pub fn ip(&self) -> IpAddr {
        self.0
    }

    /// Whether this address lies inside a reserved range.
    pub fn is_private(&self) -> bool {
        super::ranges::is_private(self)
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => Self(IpAddr::V4(v4)),
                None => Self(ip),
            },
            v4 => Self(v4),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Self(IpAddr::V4(ip))
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The address of whoever opened the transport connection.
///
/// Carries both the canonical address (used for classification) and the host
/// text as the transport supplied it (used whenever the peer itself is the
/// answer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAddress {
    address: Address,
    literal: String,
}

impl PeerAddress {
    /// Parse a transport address such as `1.2.3.4:5678` or `[::1]:5678`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let (host, ip) = split_host(text)?;
        Ok(Self {
            address: Address::from(ip),
            literal: host.to_string(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Host text without port or brackets, spelled as supplied.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn is_private(&self) -> bool {
        self.address.is_private()
    }
}

impl From<SocketAddr> for PeerAddress {
    fn from(addr: SocketAddr) -> Self {
        Self {
            address: Address::from(addr.ip()),
            literal: addr.ip().to_string(),
        }
    }
}

impl FromStr for PeerAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

impl Serialize for PeerAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.literal)
    }
}

/// Isolate the host portion of `text` and parse it.
///
/// Returns the host slice (brackets and port removed) alongside the parsed IP.
fn split_host(text: &str) -> Result<(&str, IpAddr), ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    if let Some(rest) = text.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| ParseError::UnclosedBracket(text.to_string()))?;
        if !tail.is_empty() {
            check_port(tail.strip_prefix(':'), text)?;
        }
        let ip = host
            .parse::<IpAddr>()
            .map_err(|_| ParseError::InvalidHost(text.to_string()))?;
        return Ok((host, ip));
    }

    // Bare v4, or bare v6 (more than one colon, no port possible without brackets).
    if let Ok(ip) = text.parse::<IpAddr>() {
        return Ok((text, ip));
    }

    match text.split_once(':') {
        Some((host, port)) if !port.contains(':') => {
            check_port(Some(port), text)?;
            let ip = host
                .parse::<Ipv4Addr>()
                .map_err(|_| ParseError::InvalidHost(text.to_string()))?;
            Ok((host, IpAddr::V4(ip)))
        }
        _ => Err(ParseError::InvalidHost(text.to_string())),
    }
}

/// An empty port (`1.2.3.4:`) counts as no port.
fn check_port(port: Option<&str>, text: &str) -> Result<(), ParseError> {
    match port {
        Some("") => Ok(()),
        Some(port) if port.parse::<u16>().is_ok() => Ok(()),
        _ => Err(ParseError::InvalidPort(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_and_port_forms() {
        assert_eq!(Address::parse("1.1.1.1:2000").unwrap().to_string(), "1.1.1.1");
        assert_eq!(Address::parse("[::1]:2000").unwrap().to_string(), "::1");
        assert_eq!(Address::parse("[fd00::1]").unwrap().to_string(), "fd00::1");
        assert_eq!(Address::parse(" 8.8.8.8 ").unwrap().to_string(), "8.8.8.8");
        assert_eq!(Address::parse("2001:db8::1").unwrap().family(), Family::V6);
    }

    #[test]
    fn empty_port_is_ignored() {
        assert_eq!(Address::parse("1.1.1.1:").unwrap().to_string(), "1.1.1.1");
        assert_eq!(Address::parse("[::1]:").unwrap().to_string(), "::1");
        assert_eq!(PeerAddress::parse("[fd00::1]:").unwrap().literal(), "fd00::1");
    }

    #[test]
    fn unwraps_ipv4_mapped() {
        let addr = Address::parse("::ffff:8.8.8.8").unwrap();
        assert_eq!(addr.family(), Family::V4);
        assert_eq!(addr.to_string(), "8.8.8.8");
        assert_eq!(addr, Address::parse("[::ffff:8.8.8.8]:443").unwrap());
        assert_eq!(addr, Address::parse("8.8.8.8").unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Address::parse("   "), Err(ParseError::Empty));
        assert!(matches!(Address::parse("unknown"), Err(ParseError::InvalidHost(_))));
        assert!(matches!(Address::parse("example.com:80"), Err(ParseError::InvalidHost(_))));
        assert!(matches!(Address::parse("[::1"), Err(ParseError::UnclosedBracket(_))));
        assert!(matches!(Address::parse("[::1]x"), Err(ParseError::InvalidPort(_))));
        assert!(matches!(Address::parse("1.1.1.1:http"), Err(ParseError::InvalidPort(_))));
        assert!(matches!(Address::parse("256.1.1.1"), Err(ParseError::InvalidHost(_))));
    }

    #[test]
    fn rendering_reparses_to_equal_address() {
        for text in ["10.0.0.1:80", "[fe80::1]:1", "::ffff:192.168.0.1", "2606:4700::1111"] {
            let addr = Address::parse(text).unwrap();
            let again = Address::parse(&addr.to_string()).unwrap();
            assert_eq!(addr, again);
            assert_eq!(addr.is_private(), again.is_private());
        }
    }

    #[test]
    fn peer_keeps_original_spelling() {
        let peer = PeerAddress::parse("[::ffff:8.8.8.8]:2000").unwrap();
        assert_eq!(peer.literal(), "::ffff:8.8.8.8");
        assert_eq!(peer.address().to_string(), "8.8.8.8");

        let peer = PeerAddress::from("127.0.0.1:6666".parse::<SocketAddr>().unwrap());
        assert_eq!(peer.to_string(), "127.0.0.1");
        assert!(peer.is_private());
    }
}
