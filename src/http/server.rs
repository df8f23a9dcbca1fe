//! Connection-level server.
//!
//! # Responsibilities
//! - Run the accept loop until shutdown is signalled
//! - Read each connection's request head and classify it
//! - Route upgrade attempts to the handshake responder
//! - Replay plain requests into hyper, driving the page router
//!
//! # Design Decisions
//! - hyper only upgrades on 101, so upgrade attempts never reach it
//! - hyper cannot send 1xx as a final response, so 1xx `-returnshtml`
//!   pages are written raw as well
//! - One plain request per connection (keep-alive off); a follow-up request
//!   on the same socket could otherwise carry upgrade headers past the classifier
//! - Every failure stays inside its connection task

use std::io::Cursor;
use std::sync::Arc;

use axum::Router;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tower::Service;

use crate::config::FixtureConfig;
use crate::error::ConnectionError;
use crate::handshake::directive::Directive;
use crate::handshake::request::read_request_head;
use crate::handshake::response::HtmlPage;
use crate::handshake::responder::{HandshakeContext, HandshakeOutcome};
use crate::http::pages::build_router;
use crate::net::connection::{ConnectionId, ConnectionTracker};
use crate::net::listener::{Listener, ListenerError};

const BAD_REQUEST_RESPONSE: &[u8] = b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\n\r\n";
const HEAD_TOO_LARGE_RESPONSE: &[u8] =
    b"HTTP/1.1 431 Request Header Fields Too Large\r\nConnection: close\r\n\r\n";

/// The fixture server.
pub struct FixtureServer {
    config: Arc<FixtureConfig>,
    router: Router,
    tracker: ConnectionTracker,
}

impl FixtureServer {
    /// Create a new server with the given configuration.
    pub fn new(config: FixtureConfig) -> Self {
        let router = build_router(&config);
        Self {
            config: Arc::new(config),
            router,
            tracker: ConnectionTracker::new(),
        }
    }

    /// Live connection counter.
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Accept connections until `shutdown` fires.
    ///
    /// Connections already accepted keep running after the loop exits.
    pub async fn run(self, listener: Listener, mut shutdown: broadcast::Receiver<()>) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Accept)?;
        tracing::info!(address = %addr, "Fixture server starting");

        loop {
            let accepted = tokio::select! {
                _ = shutdown.recv() => break,
                accepted = listener.accept() => accepted,
            };

            let (stream, peer_addr, permit) = match accepted {
                Ok(accepted) => accepted,
                Err(ListenerError::Accept(e)) => {
                    tracing::warn!(error = %e, "Accept failed");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let guard = self.tracker.track();
            let config = Arc::clone(&self.config);
            let router = self.router.clone();

            tokio::spawn(async move {
                let _permit = permit;
                let connection_id = guard.id();
                tracing::debug!(connection_id = %connection_id, peer_addr = %peer_addr, "Connection opened");

                if let Err(e) = handle_connection(stream, connection_id, config, router).await {
                    tracing::warn!(connection_id = %connection_id, error = %e, "Connection failed");
                }
                drop(guard);
            });
        }

        tracing::info!(
            active_connections = self.tracker.active_count(),
            "Fixture server stopped accepting"
        );
        Ok(())
    }
}

/// Classify one connection and drive it to completion.
pub async fn handle_connection(
    mut stream: TcpStream,
    connection_id: ConnectionId,
    config: Arc<FixtureConfig>,
    router: Router,
) -> Result<(), ConnectionError> {
    let read = match read_request_head(&mut stream, config.handshake.max_head_bytes).await {
        Ok(Some(read)) => read,
        Ok(None) => {
            tracing::debug!(connection_id = %connection_id, "Peer closed before sending a request");
            return Ok(());
        }
        Err(e) => {
            let response = match e {
                ConnectionError::HeadTooLarge { .. } => HEAD_TOO_LARGE_RESPONSE,
                ConnectionError::MalformedHead(_) => BAD_REQUEST_RESPONSE,
                _ => return Err(e),
            };
            stream.write_all(response).await?;
            stream.shutdown().await?;
            return Err(e);
        }
    };

    if read.head.is_upgrade() {
        let context = HandshakeContext::new(stream, read, connection_id);
        match context.respond(&config).await? {
            HandshakeOutcome::Upgraded(session) => {
                let summary = session.run().await?;
                tracing::debug!(connection_id = %connection_id, echoed = summary.echoed, "Session finished");
            }
            HandshakeOutcome::Rejected => {
                tracing::info!(connection_id = %connection_id, "Upgrade rejected");
            }
        }
        return Ok(());
    }

    let page = HtmlPage::from_directive(&Directive::for_page(read.head.path()));
    if let Some(head) = page.and_then(|page| page.informational_head()) {
        tracing::debug!(connection_id = %connection_id, path = %read.head.path(), "Informational page");
        stream.write_all(&head).await?;
        stream.shutdown().await?;
        return Ok(());
    }

    serve_plain(stream, read.into_buffered(), router).await
}

/// Serve a single plain HTTP request through hyper, replaying `buffered`
/// ahead of the rest of the socket.
async fn serve_plain(stream: TcpStream, buffered: Vec<u8>, router: Router) -> Result<(), ConnectionError> {
    let (read_half, write_half) = stream.into_split();
    let io = tokio::io::join(Cursor::new(buffered).chain(read_half), write_half);

    let service = hyper::service::service_fn(move |request: Request<Incoming>| {
        router.clone().call(request)
    });

    http1::Builder::new()
        .keep_alive(false)
        .serve_connection(TokioIo::new(io), service)
        .await?;

    Ok(())
}
