//! Request head reading and classification.
//!
//! # Responsibilities
//! - Read bytes off a fresh connection until a complete HTTP/1.x head arrives
//! - Parse it with `httparse` without consuming anything past the head
//! - Decide whether the request is an upgrade attempt
//!
//! # Design Decisions
//! - The head is bounded by a configurable byte limit
//! - Bytes received after the head are kept so they can be replayed to
//!   whoever takes over the stream (hyper or the WebSocket session)

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::ConnectionError;

/// Header slots offered to `httparse`; more headers is a malformed request.
const MAX_HEADERS: usize = 64;
const READ_CHUNK: usize = 4096;

/// Owned view of a parsed request head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
}

impl RequestHead {
    /// Parse `buf` as a request head.
    ///
    /// Returns `Ok(None)` while the head is incomplete, otherwise the head and
    /// its length in bytes.
    pub fn parse(buf: &[u8]) -> Result<Option<(Self, usize)>, httparse::Error> {
        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut req = httparse::Request::new(&mut headers);

        let head_len = match req.parse(buf)? {
            httparse::Status::Complete(len) => len,
            httparse::Status::Partial => return Ok(None),
        };

        let head = Self {
            method: req.method.unwrap_or_default().to_string(),
            target: req.path.unwrap_or("/").to_string(),
            headers: req
                .headers
                .iter()
                .map(|h| {
                    (
                        h.name.to_string(),
                        String::from_utf8_lossy(h.value).trim().to_string(),
                    )
                })
                .collect(),
        };

        Ok(Some((head, head_len)))
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Raw request target, query string included.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Request target without query string or fragment.
    pub fn path(&self) -> &str {
        let end = self
            .target
            .find(['?', '#'])
            .unwrap_or(self.target.len());
        &self.target[..end]
    }

    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value of header `name`, in arrival order.
    pub fn headers_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn host(&self) -> Option<&str> {
        self.header("host").filter(|h| !h.is_empty())
    }

    /// Client handshake nonce (`Sec-WebSocket-Key`).
    pub fn nonce(&self) -> Option<&str> {
        self.header("sec-websocket-key")
    }

    /// True when the request asks for a protocol switch: an `Upgrade` header
    /// plus the `upgrade` token in any of its `Connection` headers.
    ///
    /// Repeated `Connection` headers form one token list.
    pub fn is_upgrade(&self) -> bool {
        let has_upgrade = self.headers_named("upgrade").any(|v| !v.is_empty());
        let connection_upgrade = self
            .headers_named("connection")
            .flat_map(|v| v.split(','))
            .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));
        has_upgrade && connection_upgrade
    }
}

/// A parsed head together with everything read off the wire so far.
#[derive(Debug)]
pub struct ReadHead {
    pub head: RequestHead,
    buffered: Vec<u8>,
    head_len: usize,
}

impl ReadHead {
    /// Bytes that arrived after the head.
    pub fn leftover(&self) -> &[u8] {
        &self.buffered[self.head_len..]
    }

    /// Everything read so far, head included.
    pub fn into_buffered(self) -> Vec<u8> {
        self.buffered
    }

    /// Split into the head and the bytes that followed it.
    pub fn into_head_and_leftover(mut self) -> (RequestHead, Vec<u8>) {
        let leftover = self.buffered.split_off(self.head_len);
        (self.head, leftover)
    }
}

/// Read until a complete request head is buffered.
///
/// Returns `Ok(None)` if the peer closes before a full head arrives.
pub async fn read_request_head<R>(reader: &mut R, limit: usize) -> Result<Option<ReadHead>, ConnectionError>
where
    R: AsyncRead + Unpin,
{
    let mut buffered = Vec::with_capacity(READ_CHUNK.min(limit));
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buffered.extend_from_slice(&chunk[..n]);

        if let Some((head, head_len)) = RequestHead::parse(&buffered)? {
            if head_len > limit {
                return Err(ConnectionError::HeadTooLarge { limit });
            }
            return Ok(Some(ReadHead { head, buffered, head_len }));
        }

        if buffered.len() >= limit {
            return Err(ConnectionError::HeadTooLarge { limit });
        }
    }
}
