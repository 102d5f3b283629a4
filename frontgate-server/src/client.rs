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

//! Remote Call Adapter
//!
//! One generic executor for every catalog operation: a [`PreparedRequest`]
//! becomes exactly one HTTP request against the Front API. No retries, no
//! pagination, no reshaping of the response.

use crate::config::ApiConfig;
use async_trait::async_trait;
use frontgate_core::{GatewayError, HttpMethod, PreparedRequest};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Anything that can perform a prepared request
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn send(&self, request: &PreparedRequest) -> Result<Value, GatewayError>;
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Front API token is missing")]
    MissingToken,
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Authenticated client for the Front REST API
///
/// Cheap to share: the inner `reqwest::Client` pools connections and is
/// read-only after construction.
#[derive(Debug, Clone)]
pub struct FrontClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FrontClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let token = config
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ClientError::MissingToken)?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(config.base_url.clone()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with the request's segments appended, each percent-encoded
    fn url_for(&self, request: &PreparedRequest) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GatewayError::TransportFailure(format!("base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(&request.segments);
        Ok(url)
    }
}

#[async_trait]
impl RemoteApi for FrontClient {
    async fn send(&self, request: &PreparedRequest) -> Result<Value, GatewayError> {
        let url = self.url_for(request)?;
        let mut builder = self.http.request(reqwest_method(request.method), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::TransportFailure(e.to_string()))?;

        let status = response.status();
        debug!(
            operation = %request.operation,
            method = %request.method,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Front API responded"
        );

        let fallback = response.error_for_status_ref().err().map(|e| e.to_string());
        let bytes = response.bytes().await.map_err(|e| {
            let message = format!("Failed to read response body: {}", e);
            if status.is_success() {
                GatewayError::RemoteFailure {
                    status: status.as_u16(),
                    message,
                }
            } else {
                GatewayError::remote(status.as_u16(), message, request.versioned)
            }
        })?;

        if !status.is_success() {
            let message = remote_message(&bytes)
                .or(fallback)
                .unwrap_or_else(|| status.to_string());
            return Err(GatewayError::remote(status.as_u16(), message, request.versioned));
        }

        decode_body(status.as_u16(), &bytes)
    }
}

pub fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::DELETE => reqwest::Method::DELETE,
    }
}

/// Human-readable message from a Front error body.
///
/// Front wraps errors as `{"_error": {"status", "title", "message"}}`; other
/// services in front of it use a flat `message` or `error`.
fn remote_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .pointer("/_error/message")
        .or_else(|| value.get("message"))
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Decode a successful body. Empty bodies (204) decode to `null`.
fn decode_body(status: u16, body: &[u8]) -> Result<Value, GatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| GatewayError::RemoteFailure {
        status,
        message: format!("Undecodable response body: {}", e),
    })
}
