//! Client address resolution.
//!
//! # Responsibilities
//! - Reconcile the spoofable forwarding chain with the authoritative peer
//! - Pick one address to stand for "the client"
//!
//! # Design Decisions
//! - Public peer: nobody trusted appended the header, so the earliest public
//!   claim wins (left to right)
//! - Private peer: the header came through local infrastructure; report the
//!   last private entry and never jump past it to a public one
//! - The two scans are intentionally asymmetric
//! - No qualifying entry in either case falls back to the peer
//! - Total: never fails, whatever the header contained

use std::fmt;

use serde::Serialize;

use crate::forwarding::ForwardChain;
use crate::net::{Address, PeerAddress};

/// Where a resolved address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Peer,
    Forwarded,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Peer => "peer",
            Source::Forwarded => "forwarded",
        }
    }
}

/// The resolved client address.
///
/// Renders the peer exactly as the transport spelled it, and chain entries in
/// canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientIp {
    Peer(PeerAddress),
    Forwarded(Address),
}

impl ClientIp {
    pub fn address(&self) -> Address {
        match self {
            ClientIp::Peer(peer) => peer.address(),
            ClientIp::Forwarded(addr) => *addr,
        }
    }

    pub fn source(&self) -> Source {
        match self {
            ClientIp::Peer(_) => Source::Peer,
            ClientIp::Forwarded(_) => Source::Forwarded,
        }
    }

    pub fn is_forwarded(&self) -> bool {
        matches!(self, ClientIp::Forwarded(_))
    }
}

impl fmt::Display for ClientIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientIp::Peer(peer) => fmt::Display::fmt(peer, f),
            ClientIp::Forwarded(addr) => fmt::Display::fmt(addr, f),
        }
    }
}

impl Serialize for ClientIp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolve the client address from `peer` and `chain`.
pub fn resolve(peer: &PeerAddress, chain: &ForwardChain) -> ClientIp {
    let picked = if peer.is_private() {
        chain.iter().rev().find(|addr| addr.is_private())
    } else {
        chain.iter().find(|addr| !addr.is_private())
    };

    match picked {
        Some(addr) => ClientIp::Forwarded(*addr),
        None => ClientIp::Peer(peer.clone()),
    }
}
