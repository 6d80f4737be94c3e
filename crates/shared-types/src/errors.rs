//! # Error Types
//!
//! Format errors raised while parsing identifiers and hex quantities.

use thiserror::Error;

/// Errors raised when a string does not have the expected hex shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The value must start with `0x`.
    #[error("{field} must be 0x-prefixed")]
    MissingPrefix { field: &'static str },

    /// Wrong number of hex characters (after the prefix).
    #[error("{field} must be {expected} hex characters, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Non-hex characters.
    #[error("{field} contains non-hex characters")]
    InvalidHex { field: &'static str },

    /// A JSON-RPC quantity could not be parsed.
    #[error("Invalid hex quantity: {0}")]
    InvalidQuantity(String),
}
