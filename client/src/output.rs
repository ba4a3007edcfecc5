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

//! Display sink with optional session log

use chrono::Local;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

/// Destination for decoded session output.
///
/// Everything written goes to the display and, when a log is open, is
/// duplicated into the log file. Problems with the log never end the session:
/// logging is switched off with a warning and the display carries on.
#[derive(Debug)]
pub struct OutputSink<W> {
    display: W,
    log: Option<SessionLog>,
}

#[derive(Debug)]
struct SessionLog {
    file: File,
    path: PathBuf,
}

impl<W: AsyncWrite + Unpin> OutputSink<W> {
    /// Sink writing to `display` only.
    pub fn new(display: W) -> OutputSink<W> {
        OutputSink { display, log: None }
    }

    /// The display writer.
    pub fn display(&self) -> &W {
        &self.display
    }

    /// Path of the open session log, if any.
    pub fn log_path(&self) -> Option<&Path> {
        self.log.as_ref().map(|log| log.path.as_path())
    }

    /// Opens `path` for appending, creating it if absent, and starts logging.
    ///
    /// On failure a warning is shown and the sink stays display only. On
    /// success a session start marker is written to display and log.
    pub async fn open_log(&mut self, path: &Path) -> bool {
        let file = match OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
        {
            Ok(file) => file,
            Err(err) => {
                warn!("Failed to open log file {}: {}", path.display(), err);
                notify(&format!("[-] Failed to open log file: {err}"));
                return false;
            }
        };
        info!("Logging session output to {}", path.display());
        self.log = Some(SessionLog {
            file,
            path: path.to_path_buf(),
        });

        let marker = format!("--- Session Start: {} ---\r\n", Local::now().to_rfc3339());
        if let Err(err) = self.write(marker.as_bytes()).await {
            warn!("Failed to write session marker: {}", err);
        }
        self.log.is_some()
    }

    /// Writes decoded bytes to the display, then to the log.
    ///
    /// Only display failures are returned.
    pub async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.display.write_all(bytes).await?;
        self.display.flush().await?;

        if let Some(log) = self.log.as_mut() {
            let result = match log.file.write_all(bytes).await {
                Ok(()) => log.file.flush().await,
                Err(err) => Err(err),
            };
            if let Err(err) = result {
                warn!("Session log {} disabled: {}", log.path.display(), err);
                notify(&format!("[-] Session log disabled: {err}"));
                self.log = None;
            }
        }
        Ok(())
    }

    /// Flushes and closes the session log.
    pub async fn close_log(&mut self) {
        if let Some(log) = self.log.take() {
            if let Err(err) = log.file.sync_all().await {
                warn!("Failed to sync session log {}: {}", log.path.display(), err);
            }
        }
    }
}

/// User facing warning on stderr. Raw mode needs the explicit carriage return.
fn notify(message: &str) {
    let mut stderr = io::stderr().lock();
    let _ = write!(stderr, "{message}\r\n");
    let _ = stderr.flush();
}
