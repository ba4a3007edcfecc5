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

//! Client configuration

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// Command line arguments for `rawtel`.
#[derive(Debug, Parser)]
#[command(
    name = "rawtel",
    version,
    about = "Connect to a Telnet host and show its output as a plain byte stream",
    long_about = None
)]
pub struct Arguments {
    #[arg(
        short = 'l',
        long = "log",
        value_name = "PATH",
        help = "Append decoded session output to this file"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "connect-timeout",
        value_name = "SECONDS",
        help = "Give up connecting after this many seconds",
        default_value_t = 5
    )]
    pub connect_timeout: u64,

    #[arg(
        long = "no-banner",
        help = "Do not clear the screen or print the connection banner"
    )]
    pub no_banner: bool,

    #[arg(help = "Remote host name or address")]
    pub host: String,

    #[arg(help = "Remote port", default_value_t = 23)]
    pub port: u16,
}

impl Arguments {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse_from_env() -> Arguments {
        Arguments::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrites the single dash `-log` spelling into `--log`.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-log") => OsString::from("--log"),
            Some(value) if value.starts_with("-log=") => OsString::from(format!("-{value}")),
            _ => arg,
        })
        .collect()
}

/// Telnet client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP address
    pub host: String,

    /// Server port
    pub port: u16,

    /// File receiving a copy of the decoded output
    pub log_file: Option<PathBuf>,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Clear the screen and print a banner after connecting
    pub banner: bool,

    /// Buffer size for each direction
    pub buffer_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 23,
            log_file: None,
            connect_timeout: Duration::from_secs(5),
            banner: true,
            buffer_size: 8192,
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration with the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the session log file
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enable or disable the connection banner
    pub fn with_banner(mut self, enabled: bool) -> Self {
        self.banner = enabled;
        self
    }

    /// Set the per direction buffer size
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Get the server address as a string
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl From<Arguments> for ClientConfig {
    fn from(arguments: Arguments) -> Self {
        ClientConfig::new(arguments.host, arguments.port)
            .with_log_file(arguments.log_file)
            .with_connect_timeout(Duration::from_secs(arguments.connect_timeout))
            .with_banner(!arguments.no_banner)
    }
}
