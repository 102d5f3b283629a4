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

//! Dispatcher
//!
//! `dispatch(name, input)` is the whole call path: look the operation up,
//! check the input against its schema, partition it, and hand the prepared
//! request to the remote adapter. The dispatcher holds no mutable state, so
//! clones can serve any number of concurrent calls.

use crate::client::RemoteApi;
use crate::registry::OperationRegistry;
use frontgate_core::{partition, GatewayError, PreparedRequest};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<OperationRegistry>,
    remote: Arc<dyn RemoteApi>,
}

impl Dispatcher {
    pub fn new(registry: Arc<OperationRegistry>, remote: Arc<dyn RemoteApi>) -> Self {
        Self { registry, remote }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Invoke one operation. Exactly one remote call is made when the name
    /// and input are valid, none otherwise.
    pub async fn dispatch(&self, name: &str, input: Value) -> Result<Value, GatewayError> {
        let start = Instant::now();

        let request = match self.prepare(name, input) {
            Ok(request) => request,
            Err(e) => {
                warn!(operation = %name, kind = %e.kind(), error = %e, "Rejected call");
                return Err(e);
            }
        };

        let result = self.remote.send(&request).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(
                operation = %name,
                method = %request.method,
                path = %request.path(),
                latency_ms,
                "Dispatched"
            ),
            Err(e) => warn!(
                operation = %name,
                method = %request.method,
                path = %request.path(),
                status = e.status(),
                kind = %e.kind(),
                latency_ms,
                error = %e,
                "Dispatch failed"
            ),
        }

        result
    }

    /// Resolve, validate and partition without calling out
    pub fn prepare(&self, name: &str, input: Value) -> Result<PreparedRequest, GatewayError> {
        let descriptor = self.registry.lookup(name)?;

        let input = match input {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(GatewayError::invalid_input(
                    name,
                    format!("arguments must be an object, got {}", json_type(&other)),
                ))
            }
        };
        self.registry.validate(descriptor, &input)?;
        partition(descriptor, &input)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
