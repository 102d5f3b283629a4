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

//! MCP sessions over the buffer, line and HTTP transports.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{dispatcher, RecordingRemote};
use frontgate_core::GatewayError;
use frontgate_server::mcp::{
    BufferTransport, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse, LineTransport,
    McpHandler, McpServer,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tower::ServiceExt;

fn server(remote: Arc<RecordingRemote>) -> McpServer {
    McpServer::new(McpHandler::new(dispatcher(remote)))
}

async fn call(server: &McpServer, id: i64, method: &str, params: Option<Value>) -> JsonRpcResponse {
    server
        .handler()
        .handle_message(JsonRpcRequest::new(JsonRpcId::Number(id), method, params))
        .await
        .expect("requests get a response")
}

fn tool_text(response: &JsonRpcResponse) -> String {
    response.result.as_ref().unwrap()["content"][0]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_initialize_advertises_tools_and_resources() {
    let server = server(RecordingRemote::new());
    let response = call(
        &server,
        1,
        "initialize",
        Some(json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "test-client", "version": "1.0"}
        })),
    )
    .await;

    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "frontgate");
    assert!(result["capabilities"]["tools"].is_object());
    assert!(result["capabilities"]["resources"].is_object());
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let server = server(RecordingRemote::new());
    let response = server
        .handler()
        .handle_message(JsonRpcRequest::notification("notifications/initialized"))
        .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_tools_list_publishes_whole_catalog() {
    let server = server(RecordingRemote::new());
    let response = call(&server, 1, "tools/list", None).await;
    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();

    let catalog = server.handler().dispatcher().registry().catalog();
    assert_eq!(tools.len(), catalog.len());
    assert_eq!(tools[0]["name"], catalog.list()[0].name.as_str());

    for tool in &tools {
        assert_eq!(tool["inputSchema"]["type"], "object", "{}", tool["name"]);
    }

    let get_me = tools.iter().find(|t| t["name"] == "get_me").unwrap();
    assert_eq!(get_me["inputSchema"]["properties"], json!({}));
}

#[tokio::test]
async fn test_tools_call_success_is_pretty_payload() {
    let remote = RecordingRemote::new();
    remote.respond("get_contact", Ok(json!({"id": "crd_123", "name": "Ada"})));
    let server = server(remote.clone());

    let response = call(
        &server,
        5,
        "tools/call",
        Some(json!({"name": "get_contact", "arguments": {"contact_id": "crd_123"}})),
    )
    .await;

    assert!(response.error.is_none());
    let result = response.result.as_ref().unwrap();
    assert!(result.get("isError").is_none());
    let text = tool_text(&response);
    assert!(text.contains('\n'));
    assert_eq!(
        serde_json::from_str::<Value>(&text).unwrap(),
        json!({"id": "crd_123", "name": "Ada"})
    );
    assert_eq!(remote.call_count(), 1);
}

#[tokio::test]
async fn test_tools_call_failures_are_flagged_results() {
    let remote = RecordingRemote::new();
    remote.respond(
        "delete_draft",
        Err(GatewayError::remote(409, "Version mismatch", true)),
    );
    let server = server(remote.clone());

    let unknown = call(
        &server,
        1,
        "tools/call",
        Some(json!({"name": "does_not_exist", "arguments": {}})),
    )
    .await;
    assert!(unknown.error.is_none());
    assert_eq!(unknown.result.as_ref().unwrap()["isError"], true);
    assert_eq!(
        tool_text(&unknown),
        "unknown_operation: Unknown operation: does_not_exist"
    );
    assert_eq!(remote.call_count(), 0);

    let conflict = call(
        &server,
        2,
        "tools/call",
        Some(json!({"name": "delete_draft", "arguments": {"draft_id": "msg_1", "version": "v1"}})),
    )
    .await;
    assert_eq!(conflict.result.as_ref().unwrap()["isError"], true);
    assert!(tool_text(&conflict).starts_with("version_conflict: "));
}

#[tokio::test]
async fn test_tools_call_without_params_is_invalid_params() {
    let server = server(RecordingRemote::new());
    let response = call(&server, 1, "tools/call", None).await;
    assert_eq!(response.error.unwrap().code, JsonRpcError::INVALID_PARAMS);

    let response = call(&server, 2, "tools/call", Some(json!({"arguments": {}}))).await;
    assert_eq!(response.error.unwrap().code, JsonRpcError::INVALID_PARAMS);
}

#[tokio::test]
async fn test_unknown_method() {
    let server = server(RecordingRemote::new());
    let response = call(&server, 1, "prompts/list", None).await;
    assert_eq!(response.error.unwrap().code, JsonRpcError::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_resources_list_and_read() {
    let remote = RecordingRemote::new();
    remote.respond("get_me", Ok(json!({"id": "tea_1"})));
    let server = server(remote.clone());

    let listed = call(&server, 1, "resources/list", None).await;
    let uris: Vec<String> = listed.result.unwrap()["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["uri"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        uris,
        vec![
            "front://conversations/recent",
            "front://teammates",
            "front://inboxes",
            "front://tags",
            "front://me",
        ]
    );

    let read = call(&server, 2, "resources/read", Some(json!({"uri": "front://me"}))).await;
    let contents = &read.result.unwrap()["contents"][0];
    assert_eq!(contents["uri"], "front://me");
    assert_eq!(contents["mimeType"], "application/json");
    let text = contents["text"].as_str().unwrap();
    assert_eq!(serde_json::from_str::<Value>(text).unwrap(), json!({"id": "tea_1"}));

    let call_made = remote.calls().pop().unwrap();
    assert_eq!(call_made.path(), "/me");
}

#[tokio::test]
async fn test_recent_conversations_shortcut_binds_limit() {
    let remote = RecordingRemote::new();
    let server = server(remote.clone());

    call(
        &server,
        1,
        "resources/read",
        Some(json!({"uri": "front://conversations/recent"})),
    )
    .await;

    let request = remote.calls().pop().unwrap();
    assert_eq!(request.path(), "/conversations");
    assert_eq!(request.query, vec![("limit".to_string(), "25".to_string())]);
}

#[tokio::test]
async fn test_resource_errors() {
    let remote = RecordingRemote::new();
    remote.respond(
        "list_tags",
        Err(GatewayError::RemoteFailure {
            status: 500,
            message: "boom".to_string(),
        }),
    );
    let server = server(remote);

    let unknown = call(&server, 1, "resources/read", Some(json!({"uri": "front://nope"}))).await;
    assert_eq!(unknown.error.unwrap().code, JsonRpcError::INVALID_PARAMS);

    let failed = call(&server, 2, "resources/read", Some(json!({"uri": "front://tags"}))).await;
    let error = failed.error.unwrap();
    assert_eq!(error.code, JsonRpcError::INTERNAL_ERROR);
    assert!(error.message.starts_with("remote_failure: "));
}

#[tokio::test]
async fn test_slow_call_does_not_block_later_calls() {
    let remote = RecordingRemote::new();
    remote.delay("list_conversations", Duration::from_millis(500));
    let server = server(remote);

    let (transport, requests, mut responses) = BufferTransport::channel(8);
    let serving = tokio::spawn({
        let server = server.clone();
        async move {
            server
                .serve(Arc::new(transport), std::future::pending::<()>())
                .await
        }
    });

    requests
        .send(JsonRpcRequest::new(
            JsonRpcId::Number(1),
            "tools/call",
            Some(json!({"name": "list_conversations", "arguments": {}})),
        ))
        .await
        .unwrap();
    requests
        .send(JsonRpcRequest::new(JsonRpcId::Number(2), "ping", None))
        .await
        .unwrap();
    drop(requests);

    let first = responses.recv().await.unwrap();
    assert_eq!(first.id, JsonRpcId::Number(2));
    let second = responses.recv().await.unwrap();
    assert_eq!(second.id, JsonRpcId::Number(1));

    // In-flight calls are answered before the loop returns on end of input
    serving.await.unwrap().unwrap();
    assert!(responses.recv().await.is_none());
}

#[tokio::test]
async fn test_shutdown_stops_the_loop() {
    let server = server(RecordingRemote::new());
    let (transport, _requests, _responses) = BufferTransport::channel(1);

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        server.serve(Arc::new(transport), async {}),
    )
    .await
    .expect("serve returns on shutdown");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_line_transport_session() {
    let server = server(RecordingRemote::new());
    let (client, server_side) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server_side);
    let transport = Arc::new(LineTransport::new(server_read, server_write));

    let serving = tokio::spawn({
        let server = server.clone();
        async move { server.serve(transport, std::future::pending::<()>()).await }
    });

    let (client_read, mut client_write) = tokio::io::split(client);
    client_write
        .write_all(b"{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n")
        .await
        .unwrap();
    client_write.write_all(b"this is not json\n").await.unwrap();
    client_write
        .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":\"no-method\"}\n")
        .await
        .unwrap();
    client_write
        .write_all(b"{\"jsonrpc\":\"2.0\",\"method\":\"ping\",\"id\":\"p1\"}\n")
        .await
        .unwrap();
    client_write.shutdown().await.unwrap();

    let mut lines = BufReader::new(client_read).lines();
    let mut responses = Vec::new();
    while let Some(line) = lines.next_line().await.unwrap() {
        responses.push(serde_json::from_str::<Value>(&line).unwrap());
    }

    serving.await.unwrap().unwrap();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[1]["error"]["code"], -32600);
    assert_eq!(responses[1]["id"], "no-method");
    assert_eq!(responses[2]["id"], "p1");
    assert_eq!(responses[2]["result"], json!({}));
}

#[tokio::test]
async fn test_http_surface() {
    let remote = RecordingRemote::new();
    let router = server(remote).router();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"jsonrpc": "2.0", "method": "ping", "id": 1}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["result"], json!({}));

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = router
        .oneshot(Request::builder().uri("/mcp/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["operations"].as_u64().unwrap() > 50);
}

async fn post_mcp(router: axum::Router, body: &'static str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_http_malformed_messages_get_json_rpc_errors() {
    let router = server(RecordingRemote::new()).router();

    let (status, body) = post_mcp(router.clone(), "{not json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], Value::Null);

    let (status, body) = post_mcp(router.clone(), r#"{"jsonrpc": "2.0", "id": 3}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32600);
    assert_eq!(body["id"], 3);

    let (_, body) = post_mcp(router, r#"{"jsonrpc": "2.0", "method": "ping", "id": 4}"#).await;
    assert_eq!(body["id"], 4);
    assert_eq!(body["result"], json!({}));
}
