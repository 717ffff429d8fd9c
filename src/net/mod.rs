//! Network address subsystem.
//!
//! # Data Flow
//! ```text
//! Transport peer text / forwarding-header token
//!     → address.rs (split host from port, parse, unwrap IPv4-mapped IPv6)
//!     → Address (canonical, immutable)
//!     → ranges.rs (reserved-range lookup)
//!     → private / public
//! ```
//!
//! # Design Decisions
//! - Pure and stateless: every call takes values and returns values
//! - The reserved-range table is compile-time constant data
//! - Parsing never sees DNS names; only IP literals are accepted

pub mod address;
pub mod ranges;

pub use address::{Address, Family, ParseError, PeerAddress};
pub use ranges::{classify, is_private, ReservedRange, RESERVED_RANGES};
