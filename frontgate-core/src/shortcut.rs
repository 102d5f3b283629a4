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

//! Read-only shortcuts
//!
//! Named, pre-bound invocations of catalog operations, published to clients
//! as MCP resources. Reading a shortcut is exactly a dispatch of its
//! operation with its fixed arguments.

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortcut {
    pub uri: String,
    pub name: String,
    pub description: String,
    /// Catalog operation this shortcut invokes
    pub operation: String,
    /// Fixed input passed to the operation
    pub arguments: Value,
}

impl Shortcut {
    fn new(uri: &str, name: &str, description: &str, operation: &str, arguments: Value) -> Self {
        Self {
            uri: uri.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            operation: operation.to_string(),
            arguments,
        }
    }
}

/// The standard shortcut table, in discovery order
pub fn standard() -> Vec<Shortcut> {
    vec![
        Shortcut::new(
            "front://conversations/recent",
            "Recent conversations",
            "The 25 most recently updated conversations",
            "list_conversations",
            json!({ "limit": 25 }),
        ),
        Shortcut::new(
            "front://teammates",
            "Teammates",
            "All teammates in the company",
            "list_teammates",
            json!({}),
        ),
        Shortcut::new(
            "front://inboxes",
            "Inboxes",
            "All company inboxes",
            "list_inboxes",
            json!({}),
        ),
        Shortcut::new(
            "front://tags",
            "Tags",
            "Company tags (first 100)",
            "list_tags",
            json!({ "limit": 100 }),
        ),
        Shortcut::new(
            "front://me",
            "Current identity",
            "The identity the API token belongs to",
            "get_me",
            json!({}),
        ),
    ]
}

/// Look up a shortcut by URI
pub fn find<'a>(shortcuts: &'a [Shortcut], uri: &str) -> Option<&'a Shortcut> {
    shortcuts.iter().find(|s| s.uri == uri)
}
