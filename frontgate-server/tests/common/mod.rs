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

//! Shared doubles for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use frontgate_core::{FieldKind, GatewayError, OperationDescriptor, PreparedRequest, Route};
use frontgate_server::client::RemoteApi;
use frontgate_server::dispatcher::Dispatcher;
use frontgate_server::registry::OperationRegistry;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every request and answers from a canned table
#[derive(Default)]
pub struct RecordingRemote {
    calls: Mutex<Vec<PreparedRequest>>,
    responses: Mutex<HashMap<String, Result<Value, GatewayError>>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl RecordingRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, operation: &str, result: Result<Value, GatewayError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(operation.to_string(), result);
    }

    pub fn delay(&self, operation: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(operation.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<PreparedRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteApi for RecordingRemote {
    async fn send(&self, request: &PreparedRequest) -> Result<Value, GatewayError> {
        self.calls.lock().unwrap().push(request.clone());

        let delay = self.delays.lock().unwrap().get(&request.operation).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .unwrap()
            .get(&request.operation)
            .cloned()
            .unwrap_or_else(|| Ok(json!({"operation": request.operation})))
    }
}

pub fn dispatcher(remote: Arc<RecordingRemote>) -> Dispatcher {
    let registry = OperationRegistry::standard().expect("standard registry");
    Dispatcher::new(Arc::new(registry), remote)
}

/// Every required field with a value its schema accepts
pub fn minimal_input(op: &OperationDescriptor) -> Map<String, Value> {
    op.fields
        .iter()
        .filter(|f| f.required)
        .map(|f| {
            let value = match &f.allowed_values {
                Some(values) => match &f.kind {
                    FieldKind::Array { .. } => json!([values[0]]),
                    _ => json!(values[0]),
                },
                None => placeholder(&f.kind, &f.name),
            };
            (f.name.clone(), value)
        })
        .collect()
}

fn placeholder(kind: &FieldKind, name: &str) -> Value {
    match kind {
        FieldKind::String => json!(format!("{}_1", name)),
        FieldKind::Number => json!(1),
        FieldKind::Boolean => json!(true),
        FieldKind::Object => json!({}),
        FieldKind::Array { items } => Value::Array(vec![placeholder(items, name)]),
    }
}

/// Path the operation should hit for `input`
pub fn expected_path(op: &OperationDescriptor, input: &Map<String, Value>) -> String {
    let template = match &op.route {
        Route::Fixed(template) => template,
        Route::Selected { selector, routes } => {
            let value = input[selector].as_str().expect("selector value");
            &routes
                .iter()
                .find(|(v, _)| v == value)
                .expect("route for selector")
                .1
        }
    };

    let mut path = template.as_str().to_string();
    for param in template.params() {
        let value = input[param].as_str().expect("path value");
        path = path.replace(&format!("{{{}}}", param), value);
    }
    path
}
