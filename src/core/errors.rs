use thiserror::Error;

/// Errors raised while talking to the Hyperliquid API.
///
/// Client methods never let these escape: every failure is captured into an
/// [`ApiResponse`](crate::exchange::types::ApiResponse) envelope.
#[derive(Error, Debug)]
pub enum HyperliquidError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {code} - {message}")]
    Api { code: u16, message: String },

    #[error("Private key required for trading operations")]
    MissingCredentials,

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    Signature(String),
}

/// Errors raised by tool handlers and the dispatcher.
///
/// These cross the dispatch boundary, where the transport converts them into
/// its own error shape (JSON-RPC error object or an `Error: ...` text reply).
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Failed to {action}: {message}")]
    RemoteCallFailed { action: String, message: String },

    #[error("Unknown tool: {0}")]
    MethodNotFound(String),
}

impl ToolError {
    /// Build a `RemoteCallFailed` from a failed result envelope.
    pub fn remote(action: impl Into<String>, error: Option<String>) -> Self {
        Self::RemoteCallFailed {
            action: action.into(),
            message: error.unwrap_or_else(|| "unknown error".to_string()),
        }
    }
}
