//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Session level tests over in-memory and loopback connections

use rawtel_client::session::{self, keyboard_pump, network_pump};
use rawtel_client::{ClientConfig, ClientError, OutputSink, Session, SessionEnd};
use rawtel_telnetfilter::TelnetReader;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};
use tokio::net::TcpListener;

// ============================================================================
// Helper Functions
// ============================================================================

fn config() -> ClientConfig {
    ClientConfig::new("127.0.0.1", 23).with_buffer_size(256)
}

// ============================================================================
// Session Log
// ============================================================================

#[tokio::test]
async fn log_appends_to_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.log");
    std::fs::write(&path, b"earlier session\r\n").unwrap();

    let mut sink = OutputSink::new(Vec::new());
    assert!(sink.open_log(&path).await);
    assert_eq!(sink.log_path(), Some(path.as_path()));
    sink.write(b"Welcome\r\n").await.unwrap();
    sink.close_log().await;

    let logged = std::fs::read_to_string(&path).unwrap();
    assert!(logged.starts_with("earlier session\r\n--- Session Start: "));
    assert!(logged.ends_with(" ---\r\nWelcome\r\n"));

    // The display sees the marker and the text too.
    let shown = String::from_utf8(sink.display().clone()).unwrap();
    assert!(shown.starts_with("--- Session Start: "));
    assert!(shown.ends_with("Welcome\r\n"));
}

#[tokio::test]
async fn log_file_is_created_when_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.log");

    let mut sink = OutputSink::new(Vec::new());
    assert!(sink.open_log(&path).await);
    sink.write(b"\xFFraw").await.unwrap();
    sink.close_log().await;

    let logged = std::fs::read(&path).unwrap();
    assert!(logged.ends_with(b"\xFFraw"));
}

// ============================================================================
// Pumps
// ============================================================================

#[tokio::test]
async fn network_pump_filters_into_sink() {
    let (client, mut server) = duplex(64);
    tokio::spawn(async move {
        server.write_all(b"\xFF\xFB\x01\xFF\xFB\x03").await.unwrap();
        server.write_all(b"\x1b[32mgreen\x1b[0m ").await.unwrap();
        server.write_all(b"\xFF\xFA\x18\x01\xFF\xF0\xFF\xFF\r\n").await.unwrap();
    });

    let mut sink = OutputSink::new(Vec::new());
    let end = network_pump(TelnetReader::buffered(client), &mut sink, 32).await;
    assert!(matches!(end, SessionEnd::RemoteClosed));
    assert_eq!(sink.display(), b"\x1b[32mgreen\x1b[0m \xFF\r\n");
}

#[tokio::test]
async fn network_pump_reports_truncated_command() {
    let (client, mut server) = duplex(64);
    server.write_all(b"ok\xFF\xFD").await.unwrap();
    drop(server);

    let mut sink = OutputSink::new(Vec::new());
    let end = network_pump(TelnetReader::buffered(client), &mut sink, 32).await;
    match end {
        SessionEnd::NetworkError(err) => {
            assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
        }
        other => panic!("unexpected end {other:?}"),
    }
    assert_eq!(sink.display(), b"ok");
}

#[tokio::test]
async fn keyboard_pump_ends_when_socket_closes() {
    let (client, server) = duplex(64);
    drop(server);
    let keyboard: &[u8] = b"ls\r";
    let end = keyboard_pump(keyboard, client, 16).await;
    assert!(matches!(end, SessionEnd::NetworkError(_)));
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn remote_close_ends_session() {
    let (client, mut server) = duplex(1024);
    let (mut keys, keyboard) = duplex(64);

    let remote = tokio::spawn(async move {
        server.write_all(b"\xFF\xFD\x18\xFF\xFB\x01login: ").await.unwrap();
        let mut typed = [0u8; 5];
        server.read_exact(&mut typed).await.unwrap();
        server.write_all(b"\r\nbye\r\n").await.unwrap();
        typed
    });
    keys.write_all(b"guest").await.unwrap();

    let mut sink = OutputSink::new(Vec::new());
    let end = Session::new(client, &config())
        .run(keyboard, &mut sink, std::future::pending::<()>())
        .await;

    assert!(matches!(end, SessionEnd::RemoteClosed));
    assert_eq!(&remote.await.unwrap(), b"guest");
    assert_eq!(sink.display(), b"login: \r\nbye\r\n");
}

#[tokio::test]
async fn shutdown_signal_interrupts_session() {
    let (client, _server) = duplex(64);
    let (_keys, keyboard) = duplex(64);

    let mut sink = OutputSink::new(Vec::new());
    let end = Session::new(client, &config())
        .run(keyboard, &mut sink, async {})
        .await;
    assert!(matches!(end, SessionEnd::Interrupted));
}

#[tokio::test]
async fn escape_ends_session() {
    let (client, mut server) = duplex(64);
    let keyboard: &[u8] = b"quit\x1d";

    let mut sink = OutputSink::new(Vec::new());
    let end = Session::new(client, &config())
        .run(keyboard, &mut sink, std::future::pending::<()>())
        .await;
    assert!(matches!(end, SessionEnd::EscapeRequested));

    let mut received = Vec::new();
    server.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"quit");
}

// ============================================================================
// Connection Setup
// ============================================================================

#[tokio::test]
async fn connect_to_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = ClientConfig::new("127.0.0.1", port).with_connect_timeout(Duration::from_secs(2));

    let (stream, accepted) = tokio::join!(session::connect(&config), listener.accept());
    let stream = stream.unwrap();
    assert!(stream.nodelay().unwrap());
    assert_eq!(stream.local_addr().unwrap(), accepted.unwrap().1);
}

#[tokio::test]
async fn refused_connection_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig::new("127.0.0.1", port).with_connect_timeout(Duration::from_secs(2));
    match session::connect(&config).await {
        Err(ClientError::Connect { address, .. }) => {
            assert_eq!(address, format!("127.0.0.1:{port}"));
        }
        other => panic!("unexpected result {other:?}"),
    }
}
