//! Echo session over an upgraded stream.
//!
//! # Responsibilities
//! - Wrap the raw stream left behind by the handshake into a WebSocket
//! - Greet the peer once, then echo every data message with a marker
//! - Log the session lifecycle
//!
//! # Design Decisions
//! - Ping/pong and close replies are left to tungstenite
//! - Oversized messages are rejected by the transport and end the session

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::protocol::{Role, WebSocketConfig};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::WebSocketStream;

use crate::config::SessionConfig;
use crate::error::ConnectionError;
use crate::net::connection::ConnectionId;

/// Prefix of every echoed reply.
pub const ECHO_MARKER: &str = "Echo: ";

/// First message sent on every session.
pub fn greeting(target: &str) -> String {
    format!("Server: Hello! Connected to {}", target)
}

/// Reply for one received payload.
pub fn echo_reply(payload: &str) -> String {
    format!("{}{}", ECHO_MARKER, payload)
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closing,
    Closed,
}

/// What a finished session did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub echoed: u64,
}

/// A WebSocket session that echoes everything it receives.
pub struct EchoSession<S> {
    ws: WebSocketStream<S>,
    target: String,
    connection_id: ConnectionId,
    state: SessionState,
}

impl<S> EchoSession<S> {
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Request target the session was opened on.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl<S> EchoSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Take over `stream` in the server role.
    ///
    /// `leftover` holds bytes the client sent right after its request head;
    /// they are parsed as the first WebSocket frames.
    pub async fn open(
        stream: S,
        leftover: Vec<u8>,
        target: String,
        connection_id: ConnectionId,
        config: &SessionConfig,
    ) -> Self {
        let ws = WebSocketStream::from_partially_read(
            stream,
            leftover,
            Role::Server,
            Some(transport_config(config)),
        )
        .await;

        tracing::info!(connection_id = %connection_id, target = %target, "WebSocket connected");

        Self {
            ws,
            target,
            connection_id,
            state: SessionState::Open,
        }
    }

    /// Greet, then echo until either side closes the stream.
    pub async fn run(mut self) -> Result<SessionSummary, ConnectionError> {
        let result = self.pump().await;
        self.state = SessionState::Closed;

        tracing::info!(
            connection_id = %self.connection_id,
            target = %self.target,
            "WebSocket closed"
        );

        result.map(|echoed| SessionSummary { echoed })
    }

    async fn pump(&mut self) -> Result<u64, ConnectionError> {
        self.ws.send(Message::text(greeting(&self.target))).await?;

        let mut echoed = 0;
        while let Some(message) = self.ws.next().await {
            let payload = match message {
                Ok(Message::Text(text)) => text.as_str().to_owned(),
                Ok(Message::Binary(data)) => String::from_utf8_lossy(&data).into_owned(),
                Ok(Message::Close(frame)) => {
                    tracing::debug!(connection_id = %self.connection_id, ?frame, "Close received");
                    self.state = SessionState::Closing;
                    continue;
                }
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => continue,
                Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => break,
                Err(e) => return Err(e.into()),
            };

            tracing::debug!(connection_id = %self.connection_id, payload = %payload, "Received");

            if self.state != SessionState::Open {
                continue;
            }
            self.ws.send(Message::text(echo_reply(&payload))).await?;
            echoed += 1;
        }

        Ok(echoed)
    }
}

fn transport_config(config: &SessionConfig) -> WebSocketConfig {
    let mut transport = WebSocketConfig::default();
    transport.max_message_size = Some(config.max_message_bytes);
    transport.max_frame_size = Some(config.max_message_bytes);
    transport
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[test]
    fn greeting_names_target() {
        assert_eq!(greeting("/302-upgrade"), "Server: Hello! Connected to /302-upgrade");
    }

    #[test]
    fn reply_is_prefixed() {
        assert_eq!(echo_reply("ping"), "Echo: ping");
        assert_eq!(echo_reply(""), "Echo: ");
    }

    #[tokio::test]
    async fn greets_then_echoes_in_order() {
        let (server_io, client_io) = duplex(64 * 1024);
        let config = SessionConfig::default();

        let server = tokio::spawn(async move {
            let session = EchoSession::open(
                server_io,
                Vec::new(),
                "/101".to_string(),
                ConnectionId::new(),
                &config,
            )
            .await;
            assert_eq!(session.state(), SessionState::Open);
            session.run().await
        });

        let mut client = WebSocketStream::from_raw_socket(client_io, Role::Client, None).await;

        let hello = client.next().await.unwrap().unwrap();
        assert_eq!(hello.into_text().unwrap().as_str(), "Server: Hello! Connected to /101");

        client.send(Message::text("one")).await.unwrap();
        client.send(Message::binary(b"two".to_vec())).await.unwrap();

        let first = client.next().await.unwrap().unwrap();
        assert_eq!(first.into_text().unwrap().as_str(), "Echo: one");
        let second = client.next().await.unwrap().unwrap();
        assert_eq!(second.into_text().unwrap().as_str(), "Echo: two");

        client.close(None).await.unwrap();
        while client.next().await.is_some() {}

        let summary = server.await.unwrap().unwrap();
        assert_eq!(summary.echoed, 2);
    }

    #[tokio::test]
    async fn oversized_message_ends_session() {
        let (server_io, client_io) = duplex(64 * 1024);
        let config = SessionConfig { max_message_bytes: 16 };

        let server = tokio::spawn(async move {
            EchoSession::open(server_io, Vec::new(), "/x-upgrade".into(), ConnectionId::new(), &config)
                .await
                .run()
                .await
        });

        let mut client = WebSocketStream::from_raw_socket(client_io, Role::Client, None).await;
        let _hello = client.next().await.unwrap().unwrap();

        client.send(Message::text("a".repeat(64))).await.unwrap();

        assert!(server.await.unwrap().is_err());
    }
}
