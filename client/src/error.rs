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

//! Client error types

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that end the client before or outside of a session.
///
/// Failures while a session is running are not errors; they end the session
/// and are reported through [`SessionEnd`](crate::SessionEnd).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The host could not be resolved or refused the connection
    #[error("Connection to {address} failed: {source}")]
    Connect {
        /// Address that was dialled
        address: String,
        /// Underlying failure
        #[source]
        source: io::Error,
    },

    /// The connection attempt did not complete in time
    #[error("Connection to {address} timed out after {timeout:?}")]
    ConnectTimeout {
        /// Address that was dialled
        address: String,
        /// Configured limit
        timeout: Duration,
    },

    /// The local terminal could not be switched to raw mode
    #[error("Failed to set raw mode: {0}")]
    Terminal(#[source] io::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ClientError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Connect { .. } | Self::ConnectTimeout { .. } => 1,
            Self::Terminal(_) => 2,
            Self::Io(_) => 1,
        }
    }
}
