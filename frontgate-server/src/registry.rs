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

//! Operation registry with JSON schema validation.
//!
//! Wraps the [`Catalog`] with one compiled validator per operation. The
//! schema a client sees in `tools/list` is the schema calls are checked
//! against.

use frontgate_core::{Catalog, CatalogError, GatewayError, OperationDescriptor};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Invalid schema for {operation}: {reason}")]
    Schema { operation: String, reason: String },
}

/// Published view of one operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolListEntry {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

struct CompiledOperation {
    schema: Value,
    validator: JSONSchema,
}

pub struct OperationRegistry {
    catalog: Arc<Catalog>,
    compiled: HashMap<String, CompiledOperation>,
}

impl OperationRegistry {
    pub fn new(catalog: Arc<Catalog>) -> Result<Self, RegistryError> {
        let mut compiled = HashMap::with_capacity(catalog.len());
        for op in catalog.list() {
            let schema = op.input_schema();
            let validator = JSONSchema::options()
                .compile(&schema)
                .map_err(|e| RegistryError::Schema {
                    operation: op.name.clone(),
                    reason: e.to_string(),
                })?;
            compiled.insert(op.name.clone(), CompiledOperation { schema, validator });
        }

        Ok(Self { catalog, compiled })
    }

    /// Registry over the full Front catalog
    pub fn standard() -> Result<Self, RegistryError> {
        Self::new(Arc::new(Catalog::standard()?))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn lookup(&self, name: &str) -> Result<&OperationDescriptor, GatewayError> {
        self.catalog
            .get(name)
            .ok_or_else(|| GatewayError::UnknownOperation(name.to_string()))
    }

    /// Check call arguments against the operation's declared shape
    pub fn validate(
        &self,
        descriptor: &OperationDescriptor,
        input: &Map<String, Value>,
    ) -> Result<(), GatewayError> {
        let compiled = self
            .compiled
            .get(&descriptor.name)
            .ok_or_else(|| GatewayError::UnknownOperation(descriptor.name.clone()))?;

        let instance = Value::Object(input.clone());
        if let Err(errors) = compiled.validator.validate(&instance) {
            let message: String = errors
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GatewayError::invalid_input(&descriptor.name, message));
        }
        Ok(())
    }

    /// Every operation, in catalog order
    pub fn list(&self) -> Vec<ToolListEntry> {
        self.catalog
            .list()
            .iter()
            .map(|op| ToolListEntry {
                name: op.name.clone(),
                description: op.description.clone(),
                input_schema: self
                    .compiled
                    .get(&op.name)
                    .map(|c| c.schema.clone())
                    .unwrap_or_else(|| op.input_schema()),
            })
            .collect()
    }
}
