//! # Chain Errors

use thiserror::Error;

/// Errors that can occur talking to an Ethereum node.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        /// Raw `error.data`, usually hex-encoded revert data
        data: Option<String>,
    },

    /// No response within the client timeout
    #[error("RPC request timed out: {0}")]
    Timeout(String),

    /// The node could not be reached; the request was never delivered
    #[error("Cannot connect to RPC endpoint: {0}")]
    Connection(String),

    /// HTTP-level failure after the request may have been delivered
    #[error("RPC transport error: {0}")]
    Transport(String),

    /// The node's response could not be interpreted
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),
}

impl ChainError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ChainError::Timeout(_))
    }
}
