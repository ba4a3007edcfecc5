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

//! Transport: connection setup and the two directional pumps

use crate::terminal::ESCAPE_BYTE;
use crate::{ClientConfig, ClientError, OutputSink, Result};
use rawtel_telnetfilter::TelnetReader;
use std::future::Future;
use std::io;
use tokio::io::{AsyncBufRead, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Why a session ended.
///
/// None of these are failures of the client; every variant is a normal end
/// of the session.
#[derive(Debug)]
pub enum SessionEnd {
    /// The remote host closed the connection
    RemoteClosed,
    /// Local keyboard input reached end of stream
    LocalClosed,
    /// The user typed the escape byte
    EscapeRequested,
    /// An interrupt or termination signal arrived
    Interrupted,
    /// Reading from or writing to the socket failed
    NetworkError(io::Error),
    /// Reading the keyboard failed
    KeyboardError(io::Error),
    /// Writing to the display failed
    OutputError(io::Error),
}

impl SessionEnd {
    /// True when the remote side ended the session.
    pub fn is_remote(&self) -> bool {
        matches!(self, SessionEnd::RemoteClosed | SessionEnd::NetworkError(_))
    }
}

/// Opens the TCP connection, giving up after `config.connect_timeout`.
pub async fn connect(config: &ClientConfig) -> Result<TcpStream> {
    let address = config.address();
    info!("Connecting to {}", address);
    let stream = match timeout(config.connect_timeout, TcpStream::connect(&address)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(source)) => return Err(ClientError::Connect { address, source }),
        Err(_) => {
            return Err(ClientError::ConnectTimeout {
                address,
                timeout: config.connect_timeout,
            });
        }
    };
    if let Err(err) = stream.set_nodelay(true) {
        debug!("Unable to disable Nagle's algorithm: {}", err);
    }
    info!("Connected to {}", address);
    Ok(stream)
}

/// A live connection and its two data pumps.
#[derive(Debug)]
pub struct Session<S> {
    stream: S,
    buffer_size: usize,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite,
{
    /// Wraps an established connection.
    pub fn new(stream: S, config: &ClientConfig) -> Session<S> {
        Session {
            stream,
            buffer_size: config.buffer_size,
        }
    }

    /// Runs both pumps until either one ends or `shutdown` resolves.
    ///
    /// The pump that is still running is dropped, not joined, and the
    /// connection is closed when this returns.
    pub async fn run<K, W, F>(self, keyboard: K, sink: &mut OutputSink<W>, shutdown: F) -> SessionEnd
    where
        K: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
        F: Future<Output = ()>,
    {
        let (read_half, write_half) = tokio::io::split(self.stream);
        let reader = TelnetReader::with_capacity(self.buffer_size, read_half);

        let end = tokio::select! {
            end = network_pump(reader, sink, self.buffer_size) => end,
            end = keyboard_pump(keyboard, write_half, self.buffer_size) => end,
            () = shutdown => SessionEnd::Interrupted,
        };
        debug!("Session ended: {:?}", end);
        end
    }
}

/// Copies filtered network output into the sink until the connection ends.
pub async fn network_pump<R, W>(
    mut reader: TelnetReader<R>,
    sink: &mut OutputSink<W>,
    buffer_size: usize,
) -> SessionEnd
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let end = loop {
        let count = match reader.read(&mut buffer).await {
            Ok(0) => break SessionEnd::RemoteClosed,
            Ok(count) => count,
            Err(err) => break SessionEnd::NetworkError(err),
        };
        if let Err(err) = sink.write(&buffer[..count]).await {
            break SessionEnd::OutputError(err);
        }
    };
    debug!("Network pump finished with {:?}", reader.filter().stats());
    end
}

/// Copies keyboard input to the socket unfiltered until input ends or the
/// escape byte is typed.
pub async fn keyboard_pump<K, T>(mut keyboard: K, mut socket: T, buffer_size: usize) -> SessionEnd
where
    K: AsyncRead + Unpin,
    T: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; buffer_size.max(1)];
    loop {
        let count = match keyboard.read(&mut buffer).await {
            Ok(0) => return SessionEnd::LocalClosed,
            Ok(count) => count,
            Err(err) => return SessionEnd::KeyboardError(err),
        };
        let input = &buffer[..count];
        let escape = input.iter().position(|&byte| byte == ESCAPE_BYTE);
        let forward = escape.map_or(input, |index| &input[..index]);
        if !forward.is_empty() {
            let result = match socket.write_all(forward).await {
                Ok(()) => socket.flush().await,
                Err(err) => Err(err),
            };
            if let Err(err) = result {
                return SessionEnd::NetworkError(err);
            }
        }
        if escape.is_some() {
            info!("Escape typed, closing session");
            return SessionEnd::EscapeRequested;
        }
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
///
/// If no handler can be installed this never resolves.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    () = interrupt() => {}
                    _ = terminate.recv() => info!("Received SIGTERM"),
                }
            }
            Err(err) => {
                warn!("Unable to listen for SIGTERM: {}", err);
                interrupt().await;
            }
        }
    }
    #[cfg(not(unix))]
    interrupt().await;
}

async fn interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received interrupt"),
        Err(err) => {
            warn!("Unable to listen for interrupt: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
