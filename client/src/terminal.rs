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

//! Local terminal handling: raw mode and the connection banner

use crate::{ClientError, Result};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{self, Clear, ClearType, SetTitle};
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Keyboard byte that ends the session locally (Ctrl+]).
///
/// Raw mode delivers Ctrl+C to the remote host, so a separate escape is needed.
pub const ESCAPE_BYTE: u8 = 0x1D;

/// Keeps the local terminal in raw mode until dropped.
#[derive(Debug)]
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    /// Switches the terminal to raw mode.
    pub fn enable() -> Result<RawModeGuard> {
        terminal::enable_raw_mode().map_err(ClientError::Terminal)?;
        debug!("Terminal switched to raw mode");
        Ok(RawModeGuard { active: true })
    }

    /// Restores the original terminal mode. Later calls do nothing.
    pub fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        match terminal::disable_raw_mode() {
            Ok(()) => debug!("Terminal mode restored"),
            Err(err) => warn!("Failed to restore terminal mode: {}", err),
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Clears the screen, sets the tab title and prints the connection banner.
///
/// Lines end in `\r\n` because raw mode disables output translation.
pub async fn write_banner<W>(out: &mut W, host: &str, port: u16) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut banner = Vec::new();
    queue!(
        banner,
        MoveTo(0, 0),
        Clear(ClearType::All),
        SetTitle(format!("Telnet {host}:{port}"))
    )?;
    banner.extend_from_slice(format!("Connected to {host}:{port}\r\n").as_bytes());
    banner.extend_from_slice(b"Use Ctrl+] to exit.\r\n");
    banner.extend_from_slice(&[b'-'; 64]);
    banner.extend_from_slice(b"\r\n");
    out.write_all(&banner).await?;
    out.flush().await
}
