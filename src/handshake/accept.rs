//! `Sec-WebSocket-Accept` derivation.

use base64::engine::general_purpose::STANDARD as B64_STANDARD_ENGINE;
use base64::Engine;
use sha1::{Digest, Sha1};

/// GUID appended to the client nonce before hashing.
pub const WEBSOCKET_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Base64 of the SHA-1 digest of `nonce` followed by [`WEBSOCKET_GUID`].
pub fn compute_accept_key(nonce: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(nonce.as_bytes());
    hasher.update(WEBSOCKET_GUID.as_bytes());
    B64_STANDARD_ENGINE.encode(hasher.finalize())
}
