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

//! Top level client: connect, take over the terminal, run the session

use crate::session::{self, Session, SessionEnd};
use crate::terminal::{self, RawModeGuard};
use crate::{ClientConfig, OutputSink, Result};
use std::io::Write;
use tracing::info;

/// Telnet client driving one session against the local terminal.
#[derive(Debug, Clone)]
pub struct TelnetClient {
    config: ClientConfig,
}

impl TelnetClient {
    /// Creates a client for `config`.
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Connects and runs the session until it ends.
    ///
    /// Connection failures are returned before the terminal is touched. Once
    /// raw mode is enabled the original mode is restored on every path out of
    /// this function.
    pub async fn run(&self) -> Result<SessionEnd> {
        let config = &self.config;
        print_line(&format!("[*] Connecting to {}...", config.address()));
        let stream = session::connect(config).await?;

        let mut guard = RawModeGuard::enable()?;
        let mut stdout = tokio::io::stdout();
        if config.banner {
            terminal::write_banner(&mut stdout, &config.host, config.port).await?;
        }
        let mut sink = OutputSink::new(stdout);
        if let Some(path) = &config.log_file {
            sink.open_log(path).await;
        }

        let end = Session::new(stream, config)
            .run(tokio::io::stdin(), &mut sink, session::shutdown_signal())
            .await;

        sink.close_log().await;
        guard.restore();
        info!("Session with {} ended: {:?}", config.address(), end);
        if end.is_remote() {
            print_line("\r\n[*] Connection closed by foreign host.");
        } else {
            print_line("\r\n[*] Connection closed.");
        }
        Ok(end)
    }
}

fn print_line(message: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "{message}\r\n");
    let _ = stdout.flush();
}
