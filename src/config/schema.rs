//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file, and
//! every field has a default so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};

/// Port used when neither the file nor `PORT` sets one.
pub const DEFAULT_PORT: u16 = 2323;

/// Root configuration for the fixture server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FixtureConfig {
    /// Listener configuration (bind host, port, limits).
    pub listener: ListenerConfig,

    /// Request head handling.
    pub handshake: HandshakeConfig,

    /// WebSocket session limits.
    pub session: SessionConfig,

    /// Static content served on `/`.
    pub assets: AssetsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port.
    pub port: u16,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl ListenerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_connections: 10_000,
        }
    }
}

/// Request head handling.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HandshakeConfig {
    /// Largest request head accepted before answering 431.
    pub max_head_bytes: usize,

    /// Host used in `Location` when the request has no `Host` header.
    pub fallback_host: String,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            max_head_bytes: 16 * 1024,
            fallback_host: "localhost".to_string(),
        }
    }
}

/// WebSocket session limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Largest single message; bigger ones terminate the session.
    pub max_message_bytes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: 100 * 1024 * 1024, // 100MiB
        }
    }
}

/// Static content configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    /// Page served on `/`, read on every request.
    pub index_path: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            index_path: "./index.html".to_string(),
        }
    }
}
