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

//! Capability Catalog
//!
//! The immutable, ordered list of every operation the gateway exposes.
//! Built once at startup and shared by reference; nothing mutates it
//! afterwards.
//!
//! Construction checks that each descriptor only routes on fields it
//! declares, so the partitioner can never dereference a field that
//! discovery did not advertise.

mod contacts;
mod conversations;
mod directory;
mod drafts;
mod messages;

use crate::operation::OperationDescriptor;
use std::collections::HashMap;
use thiserror::Error;

/// Catalog construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Duplicate operation name: {0}")]
    DuplicateName(String),

    #[error("Operation {operation} declares field '{field}' twice")]
    DuplicateField { operation: String, field: String },

    #[error("Operation {operation} has malformed path template '{template}'")]
    MalformedTemplate { operation: String, template: String },

    #[error("Operation {operation} routes on undeclared field '{field}'")]
    UndeclaredRoutingField { operation: String, field: String },

    #[error("Operation {operation} routes on optional field '{field}'")]
    OptionalRoutingField { operation: String, field: String },

    #[error("Operation {operation} has an invalid route selector: {reason}")]
    InvalidSelector { operation: String, reason: String },

    #[error("Operation {operation} sends two fields as '{wire_name}'")]
    WireNameCollision { operation: String, wire_name: String },
}

/// Ordered, read-only set of operation descriptors
#[derive(Debug, Clone)]
pub struct Catalog {
    operations: Vec<OperationDescriptor>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting descriptors whose routing does not match
    /// their declared input shape.
    pub fn new(operations: Vec<OperationDescriptor>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(operations.len());
        for (position, op) in operations.iter().enumerate() {
            validate_descriptor(op)?;
            if index.insert(op.name.clone(), position).is_some() {
                return Err(CatalogError::DuplicateName(op.name.clone()));
            }
        }

        Ok(Self { operations, index })
    }

    /// The full Front catalog
    pub fn standard() -> Result<Self, CatalogError> {
        let mut operations = Vec::new();
        operations.extend(conversations::operations());
        operations.extend(messages::operations());
        operations.extend(drafts::operations());
        operations.extend(contacts::operations());
        operations.extend(directory::operations());
        Self::new(operations)
    }

    /// Descriptors in insertion order
    pub fn list(&self) -> &[OperationDescriptor] {
        &self.operations
    }

    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.index.get(name).map(|&i| &self.operations[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

fn validate_descriptor(op: &OperationDescriptor) -> Result<(), CatalogError> {
    for (i, field) in op.fields.iter().enumerate() {
        if op.fields[..i].iter().any(|f| f.name == field.name) {
            return Err(CatalogError::DuplicateField {
                operation: op.name.clone(),
                field: field.name.clone(),
            });
        }
    }

    for (i, field) in op.fields.iter().enumerate() {
        if op.fields[..i]
            .iter()
            .any(|f| f.wire_name() == field.wire_name())
        {
            return Err(CatalogError::WireNameCollision {
                operation: op.name.clone(),
                wire_name: field.wire_name().to_string(),
            });
        }
    }

    for template in op.route.templates() {
        if !template.is_well_formed() {
            return Err(CatalogError::MalformedTemplate {
                operation: op.name.clone(),
                template: template.as_str().to_string(),
            });
        }
    }

    for name in op.routing_fields() {
        match op.field_spec(name) {
            None => {
                return Err(CatalogError::UndeclaredRoutingField {
                    operation: op.name.clone(),
                    field: name.to_string(),
                })
            }
            Some(spec) if !spec.required => {
                return Err(CatalogError::OptionalRoutingField {
                    operation: op.name.clone(),
                    field: name.to_string(),
                })
            }
            Some(_) => {}
        }
    }

    if let crate::operation::Route::Selected { selector, routes } = &op.route {
        let declared = op
            .field_spec(selector)
            .and_then(|f| f.allowed_values.as_ref())
            .ok_or_else(|| CatalogError::InvalidSelector {
                operation: op.name.clone(),
                reason: format!("'{}' has no allowed values", selector),
            })?;
        let routed: Vec<&String> = routes.iter().map(|(value, _)| value).collect();
        if routed.len() != declared.len() || declared.iter().any(|v| !routed.contains(&v)) {
            return Err(CatalogError::InvalidSelector {
                operation: op.name.clone(),
                reason: format!("routes {:?} do not match allowed values {:?}", routed, declared),
            });
        }
    }

    Ok(())
}
