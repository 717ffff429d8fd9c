//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the introspection handler
//! - Wire up middleware (tracing, timeout, client address resolution)
//! - Bind server to listener and stop on shutdown signal
//!
//! Every request is answered with a JSON description of what the forwarding
//! layer decided: the resolved client address, where it came from, and the
//! header value that would be sent to the next hop.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header::InvalidHeaderName, HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Extension, Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::forwarding::{ClientIp, Source};
use crate::http::forwarded::set_forwarded_for;
use crate::http::middleware::{client_ip_middleware, ForwardingState};
use crate::net::PeerAddress;

/// Response body of the introspection handler.
#[derive(Debug, Serialize)]
pub struct ForwardingReport {
    pub client_ip: ClientIp,
    pub source: Source,
    pub peer: PeerAddress,
    pub peer_private: bool,
    pub forwarded_for: String,
}

/// HTTP server exposing the forwarding decision for each request.
pub struct HttpServer {
    router: Router,
    config: Config,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: Config) -> Result<Self, InvalidHeaderName> {
        let state = ForwardingState::from_config(&config.forwarding)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &Config, state: ForwardingState) -> Router {
        Router::new()
            .route("/{*path}", any(report_handler))
            .route("/", any(report_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                client_ip_middleware,
            ))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            header = %self.config.forwarding.header_name,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

async fn report_handler(
    State(state): State<ForwardingState>,
    Extension(client_ip): Extension<ClientIp>,
    Extension(peer): Extension<PeerAddress>,
    headers: HeaderMap,
) -> Response {
    let mut outbound = HeaderMap::new();
    if let Err(e) = set_forwarded_for(&mut outbound, &headers, &peer, &state.header_name) {
        tracing::error!(error = %e, "Failed to build forwarding header");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build forwarding header")
            .into_response();
    }

    let forwarded_for = outbound
        .get(&state.header_name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();

    Json(ForwardingReport {
        source: client_ip.source(),
        client_ip,
        peer_private: peer.is_private(),
        peer,
        forwarded_for,
    })
    .into_response()
}
