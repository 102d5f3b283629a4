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

//! Parameter Partitioning
//!
//! Splits a call's input into the three parts of one HTTP request:
//!
//! ```text
//! {conversation_id, type, body}
//!        │            │     │
//!        ▼            ▼     ▼
//!   path segment   route   JSON body / query string
//! ```
//!
//! Fields consumed by the path (or by a route selector) never reach the
//! payload. Everything else is forwarded as-is, renamed to its wire name.

use crate::error::GatewayError;
use crate::operation::{HttpMethod, OperationDescriptor, PathTemplate, PayloadPlacement, Route, Segment};
use serde::Serialize;
use serde_json::{Map, Value};

/// Fully resolved outbound request for one call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedRequest {
    pub operation: String,
    pub method: HttpMethod,
    /// Path segments with parameters substituted (unencoded)
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub versioned: bool,
}

impl PreparedRequest {
    /// Rendered path, e.g. `/contacts/crd_123`
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Partition `input` according to `descriptor`.
pub fn partition(
    descriptor: &OperationDescriptor,
    input: &Map<String, Value>,
) -> Result<PreparedRequest, GatewayError> {
    let template = resolve_route(descriptor, input)?;

    let mut segments = Vec::with_capacity(template.segments().len());
    for segment in template.segments() {
        match segment {
            Segment::Literal(literal) => segments.push(literal.clone()),
            Segment::Param(name) => segments.push(path_value(descriptor, name, input)?),
        }
    }

    let consumed = descriptor.routing_fields();
    let mut payload: Vec<(String, Value)> = Vec::new();

    // Declared fields first, in catalog order, then anything undeclared
    for field in &descriptor.fields {
        if consumed.contains(&field.name.as_str()) {
            continue;
        }
        if let Some(value) = input.get(&field.name) {
            payload.push((field.wire_name().to_string(), value.clone()));
        }
    }
    for (name, value) in input {
        if consumed.contains(&name.as_str()) || descriptor.field_spec(name).is_some() {
            continue;
        }
        payload.push((name.clone(), value.clone()));
    }

    let (query, body) = match descriptor.placement {
        PayloadPlacement::Query => (query_pairs(payload), None),
        PayloadPlacement::Body if payload.is_empty() => (Vec::new(), None),
        PayloadPlacement::Body => (Vec::new(), Some(Value::Object(payload.into_iter().collect()))),
    };

    Ok(PreparedRequest {
        operation: descriptor.name.clone(),
        method: descriptor.method,
        segments,
        query,
        body,
        versioned: descriptor.versioned,
    })
}

fn resolve_route<'a>(
    descriptor: &'a OperationDescriptor,
    input: &Map<String, Value>,
) -> Result<&'a PathTemplate, GatewayError> {
    match &descriptor.route {
        Route::Fixed(template) => Ok(template),
        Route::Selected { selector, routes } => {
            let choices = || {
                routes
                    .iter()
                    .map(|(v, _)| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let value = input.get(selector).and_then(Value::as_str).ok_or_else(|| {
                GatewayError::invalid_input(
                    &descriptor.name,
                    format!("'{}' must be one of: {}", selector, choices()),
                )
            })?;
            routes
                .iter()
                .find(|(v, _)| v == value)
                .map(|(_, template)| template)
                .ok_or_else(|| {
                    GatewayError::invalid_input(
                        &descriptor.name,
                        format!("'{}' must be one of: {}, got '{}'", selector, choices(), value),
                    )
                })
        }
    }
}

fn path_value(
    descriptor: &OperationDescriptor,
    name: &str,
    input: &Map<String, Value>,
) -> Result<String, GatewayError> {
    let value = match input.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            return Err(GatewayError::invalid_input(
                &descriptor.name,
                format!("'{}' must be a string", name),
            ))
        }
        None => {
            return Err(GatewayError::invalid_input(
                &descriptor.name,
                format!("missing required path field '{}'", name),
            ))
        }
    };

    if value.is_empty() {
        return Err(GatewayError::invalid_input(
            &descriptor.name,
            format!("'{}' must not be empty", name),
        ));
    }
    // URL builders collapse dot segments, which would retarget the request
    if value == "." || value == ".." {
        return Err(GatewayError::invalid_input(
            &descriptor.name,
            format!("'{}' must not be a relative path segment, got '{}'", name, value),
        ));
    }
    Ok(value)
}

/// Flatten payload fields into query pairs. Arrays repeat the key; objects
/// are sent as compact JSON.
fn query_pairs(payload: Vec<(String, Value)>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(payload.len());
    for (key, value) in payload {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar_text(&item)));
                }
            }
            other => pairs.push((key, scalar_text(&other))),
        }
    }
    pairs
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
