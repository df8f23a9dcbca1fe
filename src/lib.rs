//! WebSocket handshake test fixture library.
//!
//! An HTTP server that answers WebSocket upgrade attempts with hand-built
//! responses carrying arbitrary status codes, then speaks WebSocket framing
//! anyway. Used to exercise client handling of redirects, rejected upgrades
//! and other non-standard handshakes.

pub mod config;
pub mod error;
pub mod handshake;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod session;

pub use config::FixtureConfig;
pub use error::ConnectionError;
pub use http::FixtureServer;
pub use lifecycle::Shutdown;
