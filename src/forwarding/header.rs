//! Outbound forwarding header construction.
//!
//! # Responsibilities
//! - Carry upstream entries forward verbatim
//! - Append the direct peer, unless it is an internal address
//!
//! # Design Decisions
//! - No reparsing, deduplication or reordering of existing values
//! - Internal hop addresses never leak to the next hop

use crate::net::PeerAddress;

const SEPARATOR: &[u8] = b", ";

/// Build the outbound header value from the inbound lines and the peer.
///
/// May return an empty string when there were no inbound values and the peer
/// is private.
pub fn build<S: AsRef<str>>(existing: &[S], peer: &PeerAddress) -> String {
    let lines: Vec<&[u8]> = existing.iter().map(|s| s.as_ref().as_bytes()).collect();
    String::from_utf8_lossy(&build_bytes(&lines, peer)).into_owned()
}

/// Byte-level [`build`]: inbound lines are copied as raw bytes, so header
/// values that are not valid UTF-8 still reach the next hop untouched.
pub fn build_bytes<S: AsRef<[u8]>>(existing: &[S], peer: &PeerAddress) -> Vec<u8> {
    let mut value = existing
        .iter()
        .map(|line| -> &[u8] { line.as_ref() })
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    if !peer.is_private() {
        if !value.is_empty() {
            value.extend_from_slice(SEPARATOR);
        }
        value.extend_from_slice(peer.literal().as_bytes());
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(expected: &str, existing: &[&str], peer: &str) {
        let peer = PeerAddress::parse(peer).unwrap();
        assert_eq!(build(existing, &peer), expected, "input headers: {existing:?}");
    }

    #[test]
    fn private_peer_is_not_appended() {
        check("", &[], "127.0.0.1:6666");
        check("1.1.1.1", &["1.1.1.1"], "127.0.0.1:6666");
        check("1.1.1.1, 2.2.2.2", &["1.1.1.1, 2.2.2.2"], "127.0.0.1:6666");
        check("1.1.1.1, 2.2.2.2, 3.3.3.3", &["1.1.1.1, 2.2.2.2", "3.3.3.3"], "127.0.0.1:6666");
        check("1.1.1.1", &["1.1.1.1"], "[fd00::7]:6666");
    }

    #[test]
    fn public_peer_is_appended_without_port() {
        check("1.1.1.1", &[], "1.1.1.1:6666");
        check("10.0.0.1, 1.1.1.1", &["10.0.0.1"], "1.1.1.1:6666");
        check("2606:4700::1", &[], "[2606:4700::1]:443");
    }

    #[test]
    fn existing_values_pass_through_verbatim() {
        check("garbage,  x , 9.9.9.9", &["garbage,  x ", "9.9.9.9"], "127.0.0.1:1");
    }

    #[test]
    fn raw_lines_are_copied_byte_for_byte() {
        let peer = PeerAddress::parse("127.0.0.1:1").unwrap();
        let lines: [&[u8]; 2] = [b"caf\xe9-proxy", b"3.3.3.3"];
        assert_eq!(build_bytes(&lines, &peer), b"caf\xe9-proxy, 3.3.3.3");

        let peer = PeerAddress::parse("8.8.8.8:1").unwrap();
        assert_eq!(build_bytes(&lines[..1], &peer), b"caf\xe9-proxy, 8.8.8.8");
    }

    #[test]
    fn mapped_private_peer_is_not_appended() {
        check("", &[], "[::ffff:192.168.0.9]:80");
    }
}
