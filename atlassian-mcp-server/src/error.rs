//! Error types and handling for the Atlassian MCP Server
//!
//! Two families of errors exist and they never mix:
//!
//! - [`ConfigError`] is produced while resolving credentials at startup. It is
//!   fatal: the server refuses to start.
//! - [`AtlassianMcpError`] is produced by a single tool call. It is always
//!   recoverable at the dispatch boundary, where it becomes an `isError`
//!   tool result instead of a process failure.

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Guidance appended to a missing-configuration error.
pub const CONFIG_SOURCES_HELP: &str = "Configuration can be provided via:\n  \
     1. Command-line arguments: --domain, --email, --token\n  \
     2. Environment variables: ATLASSIAN_DOMAIN, ATLASSIAN_EMAIL, ATLASSIAN_API_TOKEN\n  \
     3. Config file: ~/.atlassian-mcp.json or --config <path>\n";

/// Startup configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or is not valid JSON
    #[error("Failed to parse config file {}: {message}", .path.display())]
    FileParse { path: PathBuf, message: String },

    /// The file is valid JSON but lacks one or more of the three fields
    #[error(
        "Config file {} missing required fields: {} (expected domain, email, apiToken)",
        .path.display(),
        .missing.join(", ")
    )]
    FileIncomplete { path: PathBuf, missing: Vec<String> },

    /// After merging every tier at least one field is still blank
    #[error("Missing required configuration: {}\n\n{help}", .missing.join(", "))]
    MissingConfiguration {
        missing: Vec<String>,
        help: &'static str,
    },
}

impl ConfigError {
    /// Create a missing-configuration error naming the absent keys
    pub fn missing(missing: Vec<String>) -> Self {
        ConfigError::MissingConfiguration {
            missing,
            help: CONFIG_SOURCES_HELP,
        }
    }

    /// Keys reported as missing, if this error is about missing keys
    pub fn missing_fields(&self) -> &[String] {
        match self {
            ConfigError::FileIncomplete { missing, .. }
            | ConfigError::MissingConfiguration { missing, .. } => missing,
            ConfigError::FileParse { .. } => &[],
        }
    }
}

/// Per-call error types for the Atlassian MCP Server
#[derive(Debug, Error)]
pub enum AtlassianMcpError {
    /// Remote API answered with a non-success status (-32003)
    #[error("Atlassian API error ({status}): {body}")]
    Transport { status: u16, body: String },

    /// The request never produced an HTTP response (-32003)
    #[error("Network error: {message}")]
    Network { message: String },

    /// No tool is registered under the requested name (-32601)
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    /// Invalid or missing tool argument (-32602)
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Internal server errors (-32603)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AtlassianMcpError {
    /// Get the JSON-RPC error code for this error
    pub fn error_code(&self) -> i32 {
        match self {
            AtlassianMcpError::Transport { .. } => -32003,
            AtlassianMcpError::Network { .. } => -32003,
            AtlassianMcpError::UnknownTool { .. } => -32601,
            AtlassianMcpError::InvalidParameter { .. } => -32602,
            AtlassianMcpError::Internal { .. } => -32603,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AtlassianMcpError::Transport { .. } => "transport",
            AtlassianMcpError::Network { .. } => "network",
            AtlassianMcpError::UnknownTool { .. } => "unknown_tool",
            AtlassianMcpError::InvalidParameter { .. } => "invalid_parameter",
            AtlassianMcpError::Internal { .. } => "internal",
        }
    }

    /// Get additional error data for JSON-RPC error responses
    pub fn error_data(&self) -> Value {
        let mut data = serde_json::Map::new();
        data.insert(
            "category".to_string(),
            Value::String(self.category().to_string()),
        );

        match self {
            AtlassianMcpError::Transport { status, .. } => {
                data.insert("status".to_string(), Value::Number((*status).into()));
            }
            AtlassianMcpError::UnknownTool { name } => {
                data.insert("tool".to_string(), Value::String(name.clone()));
            }
            AtlassianMcpError::InvalidParameter { parameter, .. } => {
                data.insert("parameter".to_string(), Value::String(parameter.clone()));
            }
            _ => {}
        }

        Value::Object(data)
    }

    /// Create a transport error from a response status and raw body
    pub fn transport(status: u16, body: impl Into<String>) -> Self {
        AtlassianMcpError::Transport {
            status,
            body: body.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        AtlassianMcpError::Network {
            message: message.into(),
        }
    }

    /// Create an unknown tool error
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        AtlassianMcpError::UnknownTool { name: name.into() }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        AtlassianMcpError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        AtlassianMcpError::Internal {
            message: message.into(),
        }
    }
}

/// Convert from reqwest errors raised before a response arrived
impl From<reqwest::Error> for AtlassianMcpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            AtlassianMcpError::internal(format!("Failed to build request: {}", err))
        } else if err.is_decode() {
            AtlassianMcpError::internal(format!("Failed to read response: {}", err))
        } else {
            AtlassianMcpError::network(err.to_string())
        }
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for AtlassianMcpError {
    fn from(err: serde_json::Error) -> Self {
        AtlassianMcpError::internal(format!("JSON error: {}", err))
    }
}

/// Result type alias for tool operations
pub type AtlassianMcpResult<T> = Result<T, AtlassianMcpError>;
