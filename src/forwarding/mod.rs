//! Forwarding subsystem: client resolution and outbound header rewrite.
//!
//! # Data Flow
//! ```text
//! Inbound request (peer address, forwarding header lines)
//!     → chain.rs (split lines into tokens, parse, drop garbage)
//!     → resolver.rs (trust decision) → ClientIp
//!           → logging / access control / rate limiting
//!
//! Same inputs:
//!     → header.rs (join lines, maybe append peer) → outbound header value
//!           → request forwarded to the next hop
//! ```
//!
//! # Design Decisions
//! - Everything is per-request and immutable; no shared state
//! - Malformed claims are policy input, not errors

pub mod chain;
pub mod header;
pub mod resolver;

pub use chain::ForwardChain;
pub use resolver::{resolve, ClientIp, Source};
