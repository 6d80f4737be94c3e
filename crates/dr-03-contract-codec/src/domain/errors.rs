//! # ABI Errors

use thiserror::Error;

/// Errors raised while loading an ABI or encoding/decoding ABI data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AbiError {
    /// The ABI file could not be read
    #[error("Cannot read ABI file {path}: {message}")]
    Io { path: String, message: String },

    /// The ABI file is not valid JSON or has the wrong shape
    #[error("Malformed ABI: {0}")]
    MalformedJson(String),

    /// A function the registry needs is absent from the ABI
    #[error("ABI is missing function {0}")]
    MissingFunction(String),

    /// Return data ended early
    #[error("ABI data truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// A dynamic offset or length points outside the data
    #[error("ABI offset out of bounds: {0}")]
    InvalidOffset(String),

    /// A word that should hold a bool is neither 0 nor 1
    #[error("Invalid ABI bool")]
    InvalidBool,

    /// An address word with non-zero upper bytes
    #[error("Invalid ABI address")]
    InvalidAddress,

    /// A uint does not fit the target type
    #[error("ABI value out of range for {0}")]
    ValueOutOfRange(&'static str),

    /// String bytes are not UTF-8
    #[error("ABI string is not valid UTF-8")]
    InvalidUtf8,

    /// Calldata selector matches no registry function
    #[error("Unknown function selector {}", shared_types::encode_hex(.0))]
    UnknownSelector([u8; 4]),
}

