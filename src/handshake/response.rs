//! Directive → response transitions.
//!
//! These types turn a [`Directive`] into exactly what goes on the wire,
//! without touching a socket. The responder only writes what they produce.
//!
//! Upgrade responses are emitted for any status code, not just 101. Clients
//! then see a redirect or error status followed by live WebSocket framing.
//! That combination is a deliberate simulation of misbehaving servers and is
//! not protocol-compliant.

use crate::handshake::accept::compute_accept_key;
use crate::handshake::directive::{Action, Directive, DEFAULT_HTML_STATUS, DEFAULT_UPGRADE_STATUS};
use crate::handshake::request::RequestHead;
use crate::handshake::status::phrase_for;

/// Path advertised in the `Location` header of 3xx upgrades.
pub const REDIRECT_TARGET: &str = "/redirected";

/// Challenge sent with simulated 401 pages.
pub const AUTH_CHALLENGE: &str = "Basic realm=\"Test\"";

/// Raw rejection written to unrecognized upgrade attempts.
pub const REJECT_RESPONSE: &[u8] = b"HTTP/1.1 404 Not Found\r\nConnection: close\r\n\r\n";

/// Plain body for unknown HTTP paths.
pub const NOT_FOUND_BODY: &str = "404 Not Found";

/// An HTML page carrying an arbitrary status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlPage {
    pub status: u32,
}

impl HtmlPage {
    /// Page for a [`Action::ServeHtml`] directive.
    pub fn from_directive(directive: &Directive) -> Option<Self> {
        match directive.action() {
            Action::ServeHtml => Some(Self {
                status: directive.status_code().unwrap_or(DEFAULT_HTML_STATUS),
            }),
            Action::Upgrade | Action::Reject => None,
        }
    }

    pub fn body(&self) -> String {
        format!(
            "<h1>{} {}</h1><p>This endpoint does not upgrade to WebSocket.</p>",
            self.status,
            phrase_for(self.status)
        )
    }

    /// `WWW-Authenticate` value, present only for 401.
    pub fn www_authenticate(&self) -> Option<&'static str> {
        (self.status == 401).then_some(AUTH_CHALLENGE)
    }

    /// Raw head for 1xx pages, which cannot carry a body.
    ///
    /// hyper refuses to serve informational statuses as final responses, so
    /// these are written directly and the connection is closed after them.
    pub fn informational_head(&self) -> Option<Vec<u8>> {
        if !(100..200).contains(&self.status) {
            return None;
        }
        let head = format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: text/html\r\n\
             Connection: close\r\n\r\n",
            self.status,
            phrase_for(self.status)
        );
        Some(head.into_bytes())
    }
}

/// Response to an upgrade attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeResponse {
    /// Upgrade headers with `status`, then WebSocket framing.
    Upgrade {
        status: u32,
        accept_key: String,
        location: Option<String>,
    },
    /// 404 and close.
    Reject,
}

impl HandshakeResponse {
    /// Decide the response for an upgrade request.
    ///
    /// A missing `Host` uses `fallback_host`.
    ///
    /// A missing `Sec-WebSocket-Key` does not reject the request. It hashes as
    /// the empty nonce, not as a placeholder string such as `undefined`, so
    /// the advertised accept key is `compute_accept_key("")`.
    pub fn plan(directive: &Directive, head: &RequestHead, fallback_host: &str) -> Self {
        match directive.action() {
            Action::Upgrade => {
                let status = directive.status_code().unwrap_or(DEFAULT_UPGRADE_STATUS);
                let accept_key = compute_accept_key(head.nonce().unwrap_or_default());
                let location = (300..400).contains(&status).then(|| {
                    format!(
                        "ws://{}{}",
                        head.host().unwrap_or(fallback_host),
                        REDIRECT_TARGET
                    )
                });
                Self::Upgrade { status, accept_key, location }
            }
            Action::ServeHtml | Action::Reject => Self::Reject,
        }
    }

    /// Whether a WebSocket session follows the written bytes.
    pub fn upgrades(&self) -> bool {
        matches!(self, Self::Upgrade { .. })
    }

    pub fn status(&self) -> u32 {
        match self {
            Self::Upgrade { status, .. } => *status,
            Self::Reject => 404,
        }
    }

    /// Exact bytes to write before handing the stream on.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Upgrade { status, accept_key, location } => {
                let mut head = format!(
                    "HTTP/1.1 {} {}\r\n\
                     Upgrade: websocket\r\n\
                     Connection: Upgrade\r\n\
                     Sec-WebSocket-Accept: {}\r\n",
                    status,
                    phrase_for(*status),
                    accept_key
                );
                if let Some(location) = location {
                    head.push_str(&format!("Location: {}\r\n", location));
                }
                head.push_str("\r\n");
                head.into_bytes()
            }
            Self::Reject => REJECT_RESPONSE.to_vec(),
        }
    }
}
