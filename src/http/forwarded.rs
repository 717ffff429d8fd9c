//! Request-level forwarding helpers.
//!
//! # Responsibilities
//! - Read every line of the forwarding header from a `HeaderMap`
//! - Resolve the client address for a request
//! - Stage the outbound forwarding header on a request bound for the next hop
//!
//! # Design Decisions
//! - Non-UTF-8 header lines are skipped with a warning for resolution;
//!   attacker-controlled headers never fail a request
//! - The outbound header carries inbound lines as raw bytes, UTF-8 or not
//! - An empty outbound value removes the header instead of sending it blank

use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

use crate::forwarding::{header, resolve, ClientIp, ForwardChain};
use crate::net::PeerAddress;

/// Errors raised while rewriting forwarding headers.
#[derive(Debug, Error)]
pub enum ForwardingError {
    #[error("invalid outbound header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),
}

/// All lines of `name`, in the order received.
pub fn forwarded_values<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Vec<&'a str> {
    headers
        .get_all(name)
        .iter()
        .filter_map(|value| match value.to_str() {
            Ok(s) => Some(s),
            Err(_) => {
                tracing::warn!(header = %name, "Skipping non-UTF-8 forwarding header line");
                None
            }
        })
        .collect()
}

pub fn forward_chain(headers: &HeaderMap, name: &HeaderName) -> ForwardChain {
    ForwardChain::from_values(forwarded_values(headers, name))
}

/// Resolve the client address of a request.
pub fn request_ip(headers: &HeaderMap, peer: &PeerAddress, name: &HeaderName) -> ClientIp {
    resolve(peer, &forward_chain(headers, name))
}

/// Set the forwarding header on `outbound` from the `inbound` request.
///
/// Replaces whatever `outbound` already carried for that header.
pub fn set_forwarded_for(
    outbound: &mut HeaderMap,
    inbound: &HeaderMap,
    peer: &PeerAddress,
    name: &HeaderName,
) -> Result<(), ForwardingError> {
    let lines: Vec<&[u8]> = inbound.get_all(name).iter().map(HeaderValue::as_bytes).collect();
    let value = header::build_bytes(&lines, peer);
    if value.is_empty() {
        outbound.remove(name);
    } else {
        outbound.insert(name.clone(), HeaderValue::from_bytes(&value)?);
    }
    Ok(())
}
