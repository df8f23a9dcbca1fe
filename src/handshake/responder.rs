//! Upgrade responder.
//!
//! Owns the raw stream for one upgrade attempt. The planned
//! [`HandshakeResponse`] is written verbatim, then the stream either moves
//! into an [`EchoSession`] or is shut down.
//!
//! ```text
//! Start ──plan──▶ Upgrade ──write──▶ Upgraded (session owns stream)
//!           └──▶ Reject  ──write──▶ Rejected (stream shut down)
//! ```

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::config::FixtureConfig;
use crate::error::ConnectionError;
use crate::handshake::directive::Directive;
use crate::handshake::request::{ReadHead, RequestHead};
use crate::handshake::response::HandshakeResponse;
use crate::net::connection::ConnectionId;
use crate::session::EchoSession;

/// Terminal state of an upgrade attempt.
pub enum HandshakeOutcome<S> {
    /// Upgrade bytes written; the session now owns the stream.
    Upgraded(EchoSession<S>),
    /// 404 written and the stream shut down.
    Rejected,
}

impl<S> std::fmt::Debug for HandshakeOutcome<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandshakeOutcome::Upgraded(session) => f
                .debug_tuple("Upgraded")
                .field(&session.target())
                .finish(),
            HandshakeOutcome::Rejected => f.write_str("Rejected"),
        }
    }
}

/// Everything one upgrade attempt needs, owned.
pub struct HandshakeContext<S> {
    stream: S,
    head: RequestHead,
    leftover: Vec<u8>,
    connection_id: ConnectionId,
}

impl<S> HandshakeContext<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, read: ReadHead, connection_id: ConnectionId) -> Self {
        let (head, leftover) = read.into_head_and_leftover();
        Self {
            stream,
            head,
            leftover,
            connection_id,
        }
    }

    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    /// Classify the path, write the response and perform the transition.
    pub async fn respond(mut self, config: &FixtureConfig) -> Result<HandshakeOutcome<S>, ConnectionError> {
        let path = self.head.path().to_string();
        tracing::info!(connection_id = %self.connection_id, path = %path, "WebSocket upgrade attempt");

        let directive = Directive::for_upgrade(&path);
        let response = HandshakeResponse::plan(&directive, &self.head, &config.handshake.fallback_host);

        self.stream.write_all(&response.to_bytes()).await?;
        self.stream.flush().await?;

        tracing::debug!(
            connection_id = %self.connection_id,
            path = %path,
            status = response.status(),
            upgrades = response.upgrades(),
            "Handshake response written"
        );

        if !response.upgrades() {
            self.stream.shutdown().await?;
            return Ok(HandshakeOutcome::Rejected);
        }

        let session = EchoSession::open(
            self.stream,
            self.leftover,
            self.head.target().to_string(),
            self.connection_id,
            &config.session,
        )
        .await;

        Ok(HandshakeOutcome::Upgraded(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handshake::request::read_request_head;
    use tokio::io::{duplex, AsyncReadExt, DuplexStream};

    async fn context_for(request: &str) -> (HandshakeContext<DuplexStream>, DuplexStream) {
        let (mut server_io, mut client_io) = duplex(64 * 1024);
        client_io.write_all(request.as_bytes()).await.unwrap();

        let read = read_request_head(&mut server_io, 16 * 1024).await.unwrap().unwrap();
        (HandshakeContext::new(server_io, read, ConnectionId::new()), client_io)
    }

    fn upgrade_request(path: &str) -> String {
        format!(
            "GET {} HTTP/1.1\r\n\
             Host: fixture.test\r\n\
             Upgrade: websocket\r\n\
             Connection: Upgrade\r\n\
             Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
             Sec-WebSocket-Version: 13\r\n\r\n",
            path
        )
    }

    #[tokio::test]
    async fn unknown_path_is_rejected_and_closed() {
        let (context, mut client) = context_for(&upgrade_request("/foo")).await;
        assert_eq!(context.head().path(), "/foo");

        let outcome = context.respond(&FixtureConfig::default()).await.unwrap();
        assert!(matches!(outcome, HandshakeOutcome::Rejected));
        drop(outcome);

        let mut received = Vec::new();
        client.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"HTTP/1.1 404 Not Found\r\nConnection: close\r\n\r\n");
    }

    #[tokio::test]
    async fn redirect_upgrade_hands_off_session() {
        let (context, mut client) = context_for(&upgrade_request("/307-upgrade?via=test")).await;

        let outcome = context.respond(&FixtureConfig::default()).await.unwrap();
        let session = match outcome {
            HandshakeOutcome::Upgraded(session) => session,
            HandshakeOutcome::Rejected => panic!("expected upgrade"),
        };
        assert_eq!(session.target(), "/307-upgrade?via=test");

        let expected = "HTTP/1.1 307 Temporary Redirect\r\n\
                        Upgrade: websocket\r\n\
                        Connection: Upgrade\r\n\
                        Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\
                        Location: ws://fixture.test/redirected\r\n\r\n";
        let mut head = vec![0u8; expected.len()];
        client.read_exact(&mut head).await.unwrap();
        assert_eq!(String::from_utf8(head).unwrap(), expected);
    }
}
