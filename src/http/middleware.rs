//! Client address middleware.
//!
//! Resolves the client address once per request and attaches it as a request
//! extension, so logging, access control and rate limiting all see the same
//! answer.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header::InvalidHeaderName, HeaderName, Request},
    middleware::Next,
    response::Response,
};

use crate::config::ForwardingConfig;
use crate::http::forwarded::request_ip;
use crate::net::PeerAddress;
use crate::observability::metrics;

/// State required by [`client_ip_middleware`].
#[derive(Clone, Debug)]
pub struct ForwardingState {
    pub header_name: HeaderName,
}

impl ForwardingState {
    pub fn from_config(config: &ForwardingConfig) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            header_name: HeaderName::from_bytes(config.header_name.as_bytes())?,
        })
    }
}

/// Inserts the resolved `ClientIp` and the `PeerAddress` into request extensions.
pub async fn client_ip_middleware(
    State(state): State<ForwardingState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let peer = PeerAddress::from(addr);
    let client_ip = request_ip(req.headers(), &peer, &state.header_name);

    tracing::debug!(
        peer = %peer,
        client_ip = %client_ip,
        source = client_ip.source().as_str(),
        "Resolved client address"
    );
    metrics::record_resolution(&client_ip, peer.is_private());

    req.extensions_mut().insert(client_ip);
    req.extensions_mut().insert(peer);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    use crate::forwarding::ClientIp;

    fn app() -> Router {
        let state = ForwardingState::from_config(&ForwardingConfig::default()).unwrap();
        Router::new()
            .route(
                "/",
                get(|Extension(ip): Extension<ClientIp>| async move { ip.to_string() }),
            )
            .layer(middleware::from_fn_with_state(state, client_ip_middleware))
    }

    async fn call(peer: &str, xff: Option<&str>) -> String {
        let mut builder = Request::builder().uri("/");
        if let Some(xff) = xff {
            builder = builder.header("x-forwarded-for", xff);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));

        let res = app().oneshot(req).await.unwrap();
        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn attaches_resolved_address() {
        assert_eq!(call("1.1.1.1:2000", None).await, "1.1.1.1");
        assert_eq!(call("1.1.1.1:2000", Some("127.0.0.1, 8.8.8.8")).await, "8.8.8.8");
        assert_eq!(
            call("127.0.0.1:2000", Some("127.0.0.1, 192.168.1.1, 8.8.8.8")).await,
            "192.168.1.1"
        );
        assert_eq!(call("[::ffff:8.8.8.8]:2000", None).await, "::ffff:8.8.8.8");
    }

    #[test]
    fn rejects_bad_header_name() {
        let config = ForwardingConfig {
            header_name: "bad header".into(),
        };
        assert!(ForwardingState::from_config(&config).is_err());
    }
}
