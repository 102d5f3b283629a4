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

//! Frontgate Server
//!
//! MCP gateway in front of the Front REST API: configuration, the
//! authenticated HTTP client, schema validation, dispatch and the MCP
//! surfaces (stdio and HTTP).

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod mcp;
pub mod registry;

use anyhow::Result;
use client::FrontClient;
use config::{GatewayConfig, LoggingConfig};
use dispatcher::Dispatcher;
use mcp::{McpHandler, McpServer, StdioTransport};
use registry::OperationRegistry;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing. Logs go to stderr; stdout belongs to the protocol.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.filter))?;
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}

/// Build the dispatcher for a validated configuration
pub fn build_dispatcher(config: &GatewayConfig) -> Result<Dispatcher> {
    let client = FrontClient::new(&config.api)?;
    let registry = OperationRegistry::standard()?;
    Ok(Dispatcher::new(Arc::new(registry), Arc::new(client)))
}

/// Run the gateway until input ends or ctrl-c
pub async fn run(config: GatewayConfig) -> Result<()> {
    config.validate()?;
    tracing::debug!(api = ?config.api, "Configuration loaded");

    let dispatcher = build_dispatcher(&config)?;
    let operations = dispatcher.registry().catalog().len();
    let server = McpServer::new(McpHandler::new(dispatcher));

    match config.http_socket_addr()? {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, operations, "Serving MCP over HTTP");
            axum::serve(listener, server.router())
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        None => {
            tracing::info!(operations, "Serving MCP over stdio");
            server
                .serve(Arc::new(StdioTransport::stdio()), shutdown_signal())
                .await?;
        }
    }

    tracing::info!("Frontgate stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
