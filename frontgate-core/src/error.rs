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

//! Error taxonomy for dispatching operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP status the remote API uses for a stale draft `version`
pub const VERSION_CONFLICT_STATUS: u16 = 409;

/// Every way a single call can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid input for {operation}: {reason}")]
    InvalidInput { operation: String, reason: String },

    #[error("Remote API error (HTTP {status}): {message}")]
    RemoteFailure { status: u16, message: String },

    #[error("Version conflict (HTTP {status}): {message}")]
    VersionConflict { status: u16, message: String },

    #[error("Transport error: {0}")]
    TransportFailure(String),
}

impl GatewayError {
    pub fn invalid_input(operation: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    /// Classify a non-success remote status.
    ///
    /// Only versioned operations turn 409 into [`GatewayError::VersionConflict`];
    /// a 404 on the same operation stays a plain remote failure.
    pub fn remote(status: u16, message: impl Into<String>, versioned: bool) -> Self {
        if versioned && status == VERSION_CONFLICT_STATUS {
            Self::VersionConflict {
                status,
                message: message.into(),
            }
        } else {
            Self::RemoteFailure {
                status,
                message: message.into(),
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownOperation(_) => ErrorKind::UnknownOperation,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::RemoteFailure { .. } => ErrorKind::RemoteFailure,
            Self::VersionConflict { .. } => ErrorKind::VersionConflict,
            Self::TransportFailure(_) => ErrorKind::TransportFailure,
        }
    }

    /// Remote HTTP status, when the failure came back from the API
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteFailure { status, .. } | Self::VersionConflict { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// `kind: message` text used in error-flagged responses
    pub fn envelope_text(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

/// Machine-readable failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownOperation,
    InvalidInput,
    RemoteFailure,
    VersionConflict,
    TransportFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownOperation => "unknown_operation",
            Self::InvalidInput => "invalid_input",
            Self::RemoteFailure => "remote_failure",
            Self::VersionConflict => "version_conflict",
            Self::TransportFailure => "transport_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
