//! Handshake simulation engine.
//!
//! # Data Flow
//! ```text
//! raw connection
//!     → request.rs (read & parse head, detect upgrade context)
//!     → directive.rs (path → action + status code)
//!     → response.rs (directive → exact response bytes)
//!     → responder.rs (write bytes, hand stream to session or close)
//! ```
//!
//! status.rs and accept.rs are the pure lookups the responses are built from.

pub mod accept;
pub mod directive;
pub mod request;
pub mod responder;
pub mod response;
pub mod status;

pub use accept::compute_accept_key;
pub use directive::{Action, Directive};
pub use request::{read_request_head, ReadHead, RequestHead};
pub use responder::{HandshakeContext, HandshakeOutcome};
pub use response::{HandshakeResponse, HtmlPage};
pub use status::phrase_for;
