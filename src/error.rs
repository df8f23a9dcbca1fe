//! Per-connection error type.
//!
//! Every variant is local to one connection: the connection task logs it and
//! drops the stream. Nothing here is fatal to the server.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },

    #[error("malformed request head: {0}")]
    MalformedHead(#[from] httparse::Error),

    #[error("HTTP connection error: {0}")]
    Http(#[from] hyper::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
