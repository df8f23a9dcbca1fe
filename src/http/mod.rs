//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (read head, classify)
//!         upgrade headers → handshake responder → echo session
//!         otherwise       → hyper http1 → pages.rs (axum router)
//! ```

pub mod pages;
pub mod server;

pub use pages::build_router;
pub use server::FixtureServer;
