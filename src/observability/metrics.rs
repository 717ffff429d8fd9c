//! Metrics collection and exposition.
//!
//! # Metrics
//! - `forwarded_ip_resolutions_total` (counter): resolutions by `source`
//!   (`peer` or `forwarded`) and `peer` class (`private` or `public`)
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter is optional and owns its own listener

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::forwarding::ClientIp;

pub const RESOLUTIONS_TOTAL: &str = "forwarded_ip_resolutions_total";

/// Install the Prometheus recorder and start its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one resolution outcome.
pub fn record_resolution(client_ip: &ClientIp, peer_private: bool) {
    let peer = if peer_private { "private" } else { "public" };
    ::metrics::counter!(
        RESOLUTIONS_TOTAL,
        "source" => client_ip.source().as_str(),
        "peer" => peer
    )
    .increment(1);
}
