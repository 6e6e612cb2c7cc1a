// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::process::exit;

use clap::Parser;
use swipedeck_core::error::Fallible;
use tokio::spawn;

use crate::cmd::render::render;
use crate::cmd::replay::ReplayFormat;
use crate::cmd::replay::replay;
use crate::cmd::serve::server::ServerConfig;
use crate::cmd::serve::server::start_server;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Play a gesture script against a headless deck and print what happened.
    Replay {
        /// Path to the deck script. By default, the bundled demo is used.
        script: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = ReplayFormat::Text)]
        format: ReplayFormat,
    },
    /// Render the deck a script leaves behind as a static HTML page.
    Render {
        /// Path to the deck script. By default, the bundled demo is used.
        script: Option<String>,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<String>,
    },
    /// Serve an interactive deck in the browser.
    Serve {
        /// Path to the deck script. Only its items, empty state and config are used.
        script: Option<String>,
        /// Directory with the output of `wasm-pack build crates/swipedeck-wasm --target web`.
        #[arg(long)]
        pkg: Option<String>,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Replay { script, format } => replay(script, format),
        Command::Render { script, output } => render(script, output),
        Command::Serve {
            script,
            pkg,
            host,
            port,
            open_browser,
        } => {
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig {
                script,
                pkg,
                host,
                port,
            };
            start_server(config).await
        }
    }
}
