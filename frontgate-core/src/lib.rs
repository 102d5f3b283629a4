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

//! Frontgate Core
//!
//! Operation catalog, parameter partitioning and error taxonomy for the
//! Front MCP gateway. Nothing in this crate performs I/O.

pub mod catalog;
pub mod error;
pub mod operation;
pub mod partition;
pub mod shortcut;

pub use catalog::{Catalog, CatalogError};
pub use error::{ErrorKind, GatewayError, VERSION_CONFLICT_STATUS};
pub use operation::{
    FieldKind, FieldSpec, HttpMethod, OperationDescriptor, PathTemplate, PayloadPlacement, Route,
    Segment,
};
pub use partition::{partition, PreparedRequest};
pub use shortcut::Shortcut;
