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

use rawtel_client::{Arguments, ClientConfig, TelnetClient};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load arguments from the command line
    let arguments = Arguments::parse_from_env();

    // Stdout carries the remote stream, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let client = TelnetClient::new(ClientConfig::from(arguments));
    let code = match client.run().await {
        Ok(_) => 0,
        Err(err) => {
            error!("{}", err);
            eprint!("[-] {err}\r\n");
            err.exit_code()
        }
    };

    // Standard input is read on a blocking thread that cannot be cancelled,
    // so leave without waiting for the runtime to shut down.
    std::process::exit(code);
}
