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

//! # Rawtel Telnet Client
//!
//! A small Telnet client that shows the remote host's output as a plain byte
//! stream, suitable for a modern terminal emulator with scrollback.
//!
//! ## Features
//!
//! - **No negotiation** - Telnet commands from the server are filtered out by
//!   [`rawtel_telnetfilter`] and never answered
//! - **Raw passthrough** - ANSI sequences reach the local terminal untouched and
//!   keystrokes are sent to the server byte for byte
//! - **Session logging** - Decoded output can be appended to a file
//!
//! ## Quick Start
//!
//! ```no_run
//! use rawtel_client::{ClientConfig, TelnetClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("localhost", 23)
//!         .with_log_file(Some("session.log".into()));
//!
//!     let end = TelnetClient::new(config).run().await?;
//!     println!("{end:?}");
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod output;
pub mod session;
pub mod terminal;

pub use client::TelnetClient;
pub use config::{Arguments, ClientConfig, normalize_args};
pub use error::{ClientError, Result};
pub use output::OutputSink;
pub use session::{Session, SessionEnd};
