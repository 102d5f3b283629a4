// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::Result;
use clap::Parser;
use frontgate_server::{config::GatewayConfig, init_tracing, run};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Front API base URL (overrides config file)
    #[arg(long, env = "FRONT_API_BASE_URL")]
    base_url: Option<String>,

    /// Serve MCP over HTTP on this address instead of stdio
    #[arg(long, env = "FRONTGATE_HTTP_ADDR")]
    http_addr: Option<String>,

    /// Request timeout in seconds (overrides config file)
    #[arg(long, env = "FRONTGATE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Emit JSON logs
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = GatewayConfig::load(args.config)?;

    // Apply CLI overrides
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }
    if let Some(addr) = args.http_addr {
        config.server.http_addr = Some(addr);
    }
    if let Some(timeout) = args.timeout_secs {
        config.api.timeout_secs = timeout;
    }
    if args.log_json {
        config.logging.json = true;
    }

    init_tracing(&config.logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(config));
    // A pending stdin read cannot be cancelled; don't wait on it
    runtime.shutdown_timeout(Duration::from_millis(250));
    result
}
