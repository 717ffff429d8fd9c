//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (ConnectInfo<SocketAddr>)
//!     → server.rs (Axum setup, tracing, timeout)
//!     → middleware.rs (resolve ClientIp, attach as extension)
//!     → forwarded.rs (header lines → chain → resolver / builder)
//!     → handler (JSON report)
//! ```

pub mod forwarded;
pub mod middleware;
pub mod server;

pub use forwarded::{request_ip, set_forwarded_for, ForwardingError};
pub use middleware::{client_ip_middleware, ForwardingState};
pub use server::HttpServer;
