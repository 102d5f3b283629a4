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

//! Operation Descriptors
//!
//! An [`OperationDescriptor`] declares one callable operation: its name, the
//! input fields it accepts, and the single `{method, path template}` pair it
//! maps to on the remote API. Descriptors are plain data; the
//! [`Catalog`](crate::catalog::Catalog) validates them once at startup.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// HTTP method used by an operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::PATCH => "PATCH",
            Self::DELETE => "DELETE",
        }
    }

    /// Where leftover fields go when the descriptor does not say otherwise.
    ///
    /// Reads and deletes carry them in the query string, writes in the body.
    pub fn default_placement(&self) -> PayloadPlacement {
        match self {
            Self::GET | Self::DELETE => PayloadPlacement::Query,
            Self::POST | Self::PUT | Self::PATCH => PayloadPlacement::Body,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where non-path fields are placed on the outbound request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayloadPlacement {
    Query,
    Body,
}

/// Declared type of an input field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Object,
    Array { items: Box<FieldKind> },
}

impl FieldKind {
    pub fn array_of(items: FieldKind) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array { .. } => "array",
        }
    }

    /// JSON Schema fragment for this kind. `allowed` constrains the innermost
    /// scalar (the element type for arrays).
    fn json_schema(&self, allowed: Option<&[String]>) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(self.type_name()));
        match self {
            Self::Array { items } => {
                schema.insert("items".to_string(), items.json_schema(allowed));
            }
            _ => {
                if let Some(values) = allowed {
                    schema.insert("enum".to_string(), json!(values));
                }
            }
        }
        Value::Object(schema)
    }
}

/// One declared input field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub description: String,
    /// Closed value set, if the field is an enumeration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    /// Name used on the wire when it differs from `name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wire_name: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            description: String::new(),
            allowed_values: None,
            wire_name: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Object)
    }

    pub fn strings(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::array_of(FieldKind::String))
    }

    pub fn objects(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::array_of(FieldKind::Object))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed_values = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn wire(mut self, wire_name: impl Into<String>) -> Self {
        self.wire_name = Some(wire_name.into());
        self
    }

    /// Name of the field as sent to the remote API
    pub fn wire_name(&self) -> &str {
        self.wire_name.as_deref().unwrap_or(&self.name)
    }

    pub fn json_schema(&self) -> Value {
        let mut schema = self.kind.json_schema(self.allowed_values.as_deref());
        if !self.description.is_empty() {
            if let Value::Object(map) = &mut schema {
                map.insert("description".to_string(), json!(self.description));
            }
        }
        schema
    }
}

/// A segment of a path template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// Path template such as `/contacts/{contact_id}/notes`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn new(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(param) => Segment::Param(param.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the `{param}` segments, in order
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// A literal segment that still contains braces was mistyped
    pub fn is_well_formed(&self) -> bool {
        self.raw.starts_with('/')
            && self.segments.iter().all(|s| match s {
                Segment::Literal(l) => !l.contains('{') && !l.contains('}'),
                Segment::Param(p) => !p.is_empty() && !p.contains('{') && !p.contains('}'),
            })
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// How an operation picks its path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Route {
    /// Always the same template
    Fixed(PathTemplate),
    /// Template chosen by the value of an input field; the selector field is
    /// consumed by routing and never forwarded
    Selected {
        selector: String,
        routes: Vec<(String, PathTemplate)>,
    },
}

impl Route {
    pub fn templates(&self) -> Vec<&PathTemplate> {
        match self {
            Self::Fixed(template) => vec![template],
            Self::Selected { routes, .. } => routes.iter().map(|(_, t)| t).collect(),
        }
    }

    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::Fixed(_) => None,
            Self::Selected { selector, .. } => Some(selector),
        }
    }
}

/// Descriptor for one externally callable operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Unique operation name (MCP tool name)
    pub name: String,
    /// Human-readable summary
    pub description: String,
    pub method: HttpMethod,
    pub route: Route,
    /// Declared input fields, in discovery order
    pub fields: Vec<FieldSpec>,
    pub placement: PayloadPlacement,
    /// HTTP 409 means a stale `version` rather than a generic failure
    pub versioned: bool,
}

impl OperationDescriptor {
    pub fn new(method: HttpMethod, name: impl Into<String>, path: &str) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            method,
            route: Route::Fixed(PathTemplate::new(path)),
            fields: Vec::new(),
            placement: method.default_placement(),
            versioned: false,
        }
    }

    /// Operation whose path is picked by the value of `selector`
    pub fn routed(
        method: HttpMethod,
        name: impl Into<String>,
        selector: impl Into<String>,
        routes: &[(&str, &str)],
    ) -> Self {
        Self {
            route: Route::Selected {
                selector: selector.into(),
                routes: routes
                    .iter()
                    .map(|(value, path)| (value.to_string(), PathTemplate::new(path)))
                    .collect(),
            },
            ..Self::new(method, name, "/")
        }
    }

    pub fn get(name: impl Into<String>, path: &str) -> Self {
        Self::new(HttpMethod::GET, name, path)
    }

    pub fn post(name: impl Into<String>, path: &str) -> Self {
        Self::new(HttpMethod::POST, name, path)
    }

    pub fn put(name: impl Into<String>, path: &str) -> Self {
        Self::new(HttpMethod::PUT, name, path)
    }

    pub fn patch(name: impl Into<String>, path: &str) -> Self {
        Self::new(HttpMethod::PATCH, name, path)
    }

    pub fn delete(name: impl Into<String>, path: &str) -> Self {
        Self::new(HttpMethod::DELETE, name, path)
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Standard `limit` / `page_token` pagination fields
    pub fn paginated(self) -> Self {
        self.field(FieldSpec::number("limit").describe("Maximum number of results to return"))
            .field(
                FieldSpec::string("page_token")
                    .describe("Continuation token from a previous page's _pagination.next"),
            )
    }

    /// Carry leftover fields as a JSON body even for DELETE
    pub fn payload_in_body(mut self) -> Self {
        self.placement = PayloadPlacement::Body;
        self
    }

    pub fn versioned(mut self) -> Self {
        self.versioned = true;
        self
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields consumed by routing (path params and selector)
    pub fn routing_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for template in self.route.templates() {
            for param in template.params() {
                if !names.contains(&param) {
                    names.push(param);
                }
            }
        }
        if let Some(selector) = self.route.selector() {
            names.push(selector);
        }
        names
    }

    /// JSON Schema published to clients and used for call-time validation
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_template_segments() {
        let template = PathTemplate::new("/conversations/{conversation_id}/comments");
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("conversations".to_string()),
                Segment::Param("conversation_id".to_string()),
                Segment::Literal("comments".to_string()),
            ]
        );
        assert_eq!(template.params().collect::<Vec<_>>(), vec!["conversation_id"]);
        assert!(template.is_well_formed());
    }

    #[test]
    fn test_malformed_template() {
        assert!(!PathTemplate::new("/contacts/{contact_id").is_well_formed());
        assert!(!PathTemplate::new("contacts").is_well_formed());
        assert!(!PathTemplate::new("/contacts/{}").is_well_formed());
    }

    #[test]
    fn test_default_placement() {
        assert_eq!(OperationDescriptor::get("a", "/a").placement, PayloadPlacement::Query);
        assert_eq!(OperationDescriptor::delete("a", "/a").placement, PayloadPlacement::Query);
        assert_eq!(OperationDescriptor::patch("a", "/a").placement, PayloadPlacement::Body);
        assert_eq!(
            OperationDescriptor::delete("a", "/a").payload_in_body().placement,
            PayloadPlacement::Body
        );
    }

    #[test]
    fn test_input_schema_shape() {
        let op = OperationDescriptor::patch("update_conversation", "/conversations/{conversation_id}")
            .field(FieldSpec::string("conversation_id").required())
            .field(FieldSpec::string("status").one_of(&["open", "archived"]))
            .field(FieldSpec::strings("tag_ids").one_of(&["tag_1"]));

        let schema = op.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["required"], json!(["conversation_id"]));
        assert_eq!(schema["properties"]["status"]["enum"], json!(["open", "archived"]));
        assert_eq!(schema["properties"]["tag_ids"]["type"], "array");
        assert_eq!(schema["properties"]["tag_ids"]["items"]["enum"], json!(["tag_1"]));
    }

    #[test]
    fn test_empty_input_schema() {
        let schema = OperationDescriptor::get("get_me", "/me").input_schema();
        assert_eq!(schema["properties"], json!({}));
        assert_eq!(schema["required"], json!([]));
    }

    #[test]
    fn test_routing_fields() {
        let op = OperationDescriptor::routed(
            HttpMethod::POST,
            "reply",
            "type",
            &[
                ("comment", "/conversations/{conversation_id}/comments"),
                ("reply", "/conversations/{conversation_id}/messages"),
            ],
        );
        assert_eq!(op.routing_fields(), vec!["conversation_id", "type"]);
    }

    #[test]
    fn test_wire_name() {
        let field = FieldSpec::string("query").wire("q");
        assert_eq!(field.wire_name(), "q");
        assert_eq!(FieldSpec::number("limit").wire_name(), "limit");
    }
}
