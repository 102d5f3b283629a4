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

//! Model Context Protocol (MCP) Server Implementation
//!
//! Exposes every catalog operation as an MCP tool and every shortcut as an
//! MCP resource.
//!
//! ```text
//! transport ──► McpServer ──► McpHandler ──► Dispatcher ──► FrontClient
//!   (line)       (task per     (method        (validate,      (one HTTP
//!                 request)      routing)       partition)      request)
//! ```

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod transport;

pub use handlers::McpHandler;
pub use protocol::*;
pub use server::McpServer;
pub use transport::{BufferTransport, LineTransport, McpTransport, StdioTransport, TransportError};
