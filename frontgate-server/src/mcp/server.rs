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

//! MCP Server Implementation
//!
//! Runs the read loop over a transport, handling each request on its own
//! task, and exposes the same handler over HTTP.

use crate::mcp::handlers::McpHandler;
use crate::mcp::protocol::*;
use crate::mcp::transport::{McpTransport, TransportError};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// MCP endpoint paths
pub mod paths {
    /// HTTP POST endpoint for JSON-RPC requests
    pub const MCP_HTTP: &str = "/mcp";
    /// Health check endpoint (GET)
    pub const MCP_HEALTH: &str = "/mcp/health";
}

/// MCP Server
#[derive(Clone)]
pub struct McpServer {
    handler: Arc<McpHandler>,
}

impl McpServer {
    pub fn new(handler: McpHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn handler(&self) -> &McpHandler {
        &self.handler
    }

    /// Serve `transport` until its input ends or `shutdown` resolves.
    ///
    /// Requests run concurrently; a slow call never holds up the ones read
    /// after it. On end of input, in-flight calls finish and are answered.
    /// On shutdown they are abandoned.
    pub async fn serve<T, F>(&self, transport: Arc<T>, shutdown: F) -> Result<(), TransportError>
    where
        T: McpTransport + 'static,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut in_flight = JoinSet::new();

        loop {
            let next = tokio::select! {
                _ = &mut shutdown => {
                    info!(in_flight = in_flight.len(), "Shutdown requested, closing transport");
                    in_flight.shutdown().await;
                    return Ok(());
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "MCP request task failed");
                    }
                    continue;
                }
                next = transport.recv() => next,
            };

            match next {
                Ok(Some(request)) => {
                    let handler = self.handler.clone();
                    let transport = transport.clone();
                    in_flight.spawn(async move {
                        if let Some(response) = handler.handle_message(request).await {
                            if let Err(e) = transport.send(&response).await {
                                error!(error = %e, "Failed to send MCP response");
                            }
                        }
                    });
                }
                Ok(None) => {
                    info!("MCP input closed");
                    break;
                }
                Err(TransportError::Json(e)) => {
                    warn!(error = %e, "Invalid JSON-RPC message");
                    let response = JsonRpcResponse::error(
                        JsonRpcId::Null,
                        JsonRpcError::parse_error(format!("Invalid JSON: {}", e)),
                    );
                    transport.send(&response).await?;
                }
                Err(TransportError::InvalidRequest(response)) => {
                    warn!(id = ?response.id, "Invalid JSON-RPC request");
                    transport.send(&response).await?;
                }
                Err(e) => return Err(e),
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "MCP request task failed");
            }
        }
        Ok(())
    }

    /// Axum router exposing the handler over HTTP
    pub fn router(&self) -> Router {
        Router::new()
            .route(paths::MCP_HTTP, post(handle_mcp_request))
            .route(paths::MCP_HEALTH, get(handle_mcp_health))
            .layer(TraceLayer::new_for_http())
            .with_state(self.handler.clone())
    }
}

/// Handle MCP health check (GET /mcp/health)
async fn handle_mcp_health(State(handler): State<Arc<McpHandler>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "protocol_version": MCP_PROTOCOL_VERSION,
        "server_name": SERVER_NAME,
        "server_version": env!("CARGO_PKG_VERSION"),
        "operations": handler.dispatcher().registry().catalog().len(),
    }))
}

/// Handle MCP JSON-RPC request over HTTP POST
async fn handle_mcp_request(State(handler): State<Arc<McpHandler>>, body: Bytes) -> Response {
    // Decode by hand so malformed messages still get JSON-RPC errors
    let message: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            let error = JsonRpcError::parse_error(format!("Invalid JSON: {}", e));
            return Json(JsonRpcResponse::error(JsonRpcId::Null, error)).into_response();
        }
    };
    let request = match JsonRpcRequest::from_message(message) {
        Ok(request) => request,
        Err(response) => return Json(response).into_response(),
    };

    match handler.handle_message(request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
