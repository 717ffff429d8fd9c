//! Client address resolution behind forwarding proxies.
//!
//! Works out which address really originated a request that may have passed
//! through proxies, and builds the forwarding header for the next hop.

pub mod config;
pub mod forwarding;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::Config;
pub use forwarding::{resolve, ClientIp, ForwardChain};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use net::{Address, PeerAddress};
