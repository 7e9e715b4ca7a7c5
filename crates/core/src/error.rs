//! Unified error types for the Hatena Blog MCP server.
//!
//! Every core operation surfaces one of these; the server converts them
//! into MCP error objects with stable codes.

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::config::ConfigError;

/// Unified error types for the Hatena Blog MCP server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty keyword).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Entry or category does not exist upstream.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Network or feed parsing failure while talking to the blog platform.
    #[error("UPSTREAM_ERROR: {0}")]
    Upstream(String),

    /// Cache directory read or write failure.
    #[error("STORAGE_ERROR: {0}")]
    Storage(String),

    /// A full sync stopped partway; already written entries are kept.
    #[error("SYNC_INTERRUPTED: {synced} entries synced before failure: {reason}")]
    SyncInterrupted { synced: usize, reason: String },

    /// Configuration is missing or invalid.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        Error::Storage(format!("{context}: {err}"))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::NotFound(msg) => (-32001, msg.clone()),
            Error::Storage(msg) => (-32002, msg.clone()),
            Error::Upstream(msg) => (-32008, msg.clone()),
            Error::SyncInterrupted { .. } => (-32013, err.to_string()),
            Error::Config(e) => (-32014, e.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
