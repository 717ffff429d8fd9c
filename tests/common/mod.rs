//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use forwarded_ip::config::Config;
use forwarded_ip::http::HttpServer;
use forwarded_ip::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// Start the server on an ephemeral loopback port.
pub async fn start_server(mut config: Config) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
