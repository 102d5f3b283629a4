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

//! MCP Request Handlers
//!
//! Handles JSON-RPC 2.0 requests for the MCP protocol. Tool calls never fail
//! at the JSON-RPC level: dispatch errors come back as `isError` results.

use crate::dispatcher::Dispatcher;
use crate::mcp::protocol::*;
use frontgate_core::shortcut::{self, Shortcut};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

const JSON_MIME: &str = "application/json";

/// MCP request handler
pub struct McpHandler {
    dispatcher: Dispatcher,
    shortcuts: Vec<Shortcut>,
}

impl McpHandler {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::with_shortcuts(dispatcher, shortcut::standard())
    }

    pub fn with_shortcuts(dispatcher: Dispatcher, shortcuts: Vec<Shortcut>) -> Self {
        Self {
            dispatcher,
            shortcuts,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle any inbound message. Notifications yield `None`.
    pub async fn handle_message(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        match request.id.clone() {
            Some(id) => Some(self.handle_request(id, request).await),
            None => {
                debug!(method = %request.method, "MCP notification");
                None
            }
        }
    }

    /// Handle a JSON-RPC request
    pub async fn handle_request(&self, id: JsonRpcId, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "MCP request received");

        match request.method.as_str() {
            "ping" => JsonRpcResponse::success(id, json!({})),
            "initialize" => self.handle_initialize(id, request.params),

            "resources/list" => self.handle_resources_list(id),
            "resources/read" => self.handle_resources_read(id, request.params).await,

            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,

            _ => {
                warn!(method = %request.method, "Unknown MCP method");
                JsonRpcResponse::error(id, JsonRpcError::method_not_found(&request.method))
            }
        }
    }

    fn handle_initialize(&self, id: JsonRpcId, params: Option<Value>) -> JsonRpcResponse {
        if let Some(params) = params {
            match serde_json::from_value::<InitializeParams>(params) {
                Ok(params) => {
                    let client = params.client_info.as_ref().map(|c| c.name.as_str());
                    info!(
                        client = client.unwrap_or("unknown"),
                        protocol_version = %params.protocol_version,
                        "MCP client initializing"
                    );
                }
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e)),
                    )
                }
            }
        }

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                resources: Some(ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                }),
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, &result)
    }

    fn handle_tools_list(&self, id: JsonRpcId) -> JsonRpcResponse {
        let tools = self
            .dispatcher
            .registry()
            .list()
            .into_iter()
            .map(|entry| Tool {
                name: entry.name,
                description: Some(entry.description),
                input_schema: entry.input_schema,
            })
            .collect();

        respond(
            id,
            &ListToolsResult {
                tools,
                next_cursor: None,
            },
        )
    }

    async fn handle_tools_call(&self, id: JsonRpcId, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match parse_params(params, "tools/call") {
            Ok(params) => params,
            Err(e) => return JsonRpcResponse::error(id, e),
        };

        let result = self.dispatcher.dispatch(&params.name, params.arguments).await;
        respond(id, &CallToolResult::from(result))
    }

    fn handle_resources_list(&self, id: JsonRpcId) -> JsonRpcResponse {
        let resources = self
            .shortcuts
            .iter()
            .map(|s| Resource {
                uri: s.uri.clone(),
                name: s.name.clone(),
                description: Some(s.description.clone()),
                mime_type: Some(JSON_MIME.to_string()),
            })
            .collect();

        respond(
            id,
            &ListResourcesResult {
                resources,
                next_cursor: None,
            },
        )
    }

    async fn handle_resources_read(&self, id: JsonRpcId, params: Option<Value>) -> JsonRpcResponse {
        let params: ReadResourceParams = match parse_params(params, "resources/read") {
            Ok(params) => params,
            Err(e) => return JsonRpcResponse::error(id, e),
        };

        let Some(shortcut) = shortcut::find(&self.shortcuts, &params.uri) else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("Unknown resource: {}", params.uri)),
            );
        };

        match self
            .dispatcher
            .dispatch(&shortcut.operation, shortcut.arguments.clone())
            .await
        {
            Ok(payload) => respond(
                id,
                &ReadResourceResult {
                    contents: vec![ResourceContent {
                        uri: shortcut.uri.clone(),
                        mime_type: Some(JSON_MIME.to_string()),
                        text: Some(pretty(&payload)),
                    }],
                },
            ),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.envelope_text())),
        }
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>, method: &str) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params(format!("Missing {} params", method)))?;
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid {} params: {}", method, e)))
}

fn respond<T: Serialize>(id: JsonRpcId, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
    }
}
