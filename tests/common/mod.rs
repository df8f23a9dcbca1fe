//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use ws_handshake_fixture::net::{ConnectionTracker, Listener};
use ws_handshake_fixture::{FixtureConfig, FixtureServer, Shutdown};

/// Nonce from the WebSocket RFC and the accept key it must produce.
pub const SAMPLE_NONCE: &str = "dGhlIHNhbXBsZSBub25jZQ==";
pub const SAMPLE_ACCEPT: &str = "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=";

/// Start the fixture on an ephemeral local port.
pub async fn start_fixture(config: FixtureConfig) -> (SocketAddr, Shutdown) {
    let (addr, shutdown, _) = start_tracked_fixture(config).await;
    (addr, shutdown)
}

/// Like [`start_fixture`], also returning the server's live connection counter.
pub async fn start_tracked_fixture(config: FixtureConfig) -> (SocketAddr, Shutdown, ConnectionTracker) {
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    let listener = Listener::from_tcp(tcp, config.listener.max_connections).unwrap();

    let shutdown = Shutdown::new();
    let server = FixtureServer::new(config);
    let tracker = server.tracker();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown, tracker)
}

/// A raw upgrade request for `path` with the sample nonce.
pub fn upgrade_request(path: &str, host: &str) -> String {
    format!(
        "GET {} HTTP/1.1\r\n\
         Host: {}\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Key: {}\r\n\
         Sec-WebSocket-Version: 13\r\n\r\n",
        path, host, SAMPLE_NONCE
    )
}

/// Read a response head; returns it as text plus any bytes that followed.
pub async fn read_response_head(stream: &mut TcpStream) -> (String, Vec<u8>) {
    let mut buffered = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = tokio::time::timeout(Duration::from_secs(5), stream.read(&mut chunk))
            .await
            .expect("timed out waiting for response head")
            .unwrap();
        assert!(n > 0, "connection closed before response head completed");
        buffered.extend_from_slice(&chunk[..n]);

        if let Some(pos) = buffered.windows(4).position(|w| w == b"\r\n\r\n") {
            let leftover = buffered.split_off(pos + 4);
            return (String::from_utf8(buffered).unwrap(), leftover);
        }
    }
}

/// Send an upgrade request and read the response head.
pub async fn raw_upgrade(addr: SocketAddr, path: &str) -> (TcpStream, String, Vec<u8>) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(upgrade_request(path, &addr.to_string()).as_bytes())
        .await
        .unwrap();
    let (head, leftover) = read_response_head(&mut stream).await;
    (stream, head, leftover)
}

/// Value of header `name` in a raw response head.
pub fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.split("\r\n").skip(1).find_map(|line| {
        let (n, v) = line.split_once(':')?;
        n.trim().eq_ignore_ascii_case(name).then(|| v.trim())
    })
}
