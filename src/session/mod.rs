//! WebSocket sessions created by successful upgrades.
//!
//! One session per upgraded connection. Sessions share nothing; each one
//! owns its stream until either peer closes it.

pub mod echo;

pub use echo::{EchoSession, SessionState, SessionSummary};
