//! # Registry Errors
//!
//! The single translation point for lower-level errors. Callers decide
//! retries from [`RegistryError::is_retryable`].

use shared_types::FormatError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// An id, hash or address failed validation. Nothing was sent.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Missing or inconsistent configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The transaction could not be signed.
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// The node refused the transaction (includes contract reverts).
    #[error("Transaction rejected ({code}): {message}")]
    BroadcastRejected { code: i64, message: String },

    /// The send timed out or broke mid-flight; the transaction may still
    /// be mined. Poll `tx_hash`, do not resend.
    #[error("Broadcast outcome unknown for {tx_hash}")]
    BroadcastUnknown { tx_hash: String },

    /// A read did not complete in time.
    #[error("Network timeout: {0}")]
    NetworkTimeout(String),

    /// The node could not be reached or answered with an error on a read.
    #[error("Network error: {0}")]
    Network(String),

    /// Contract return data could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl RegistryError {
    /// Whether the same call may succeed if repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RegistryError::NetworkTimeout(_) | RegistryError::Network(_)
        )
    }
}

impl From<FormatError> for RegistryError {
    fn from(e: FormatError) -> Self {
        RegistryError::InvalidFormat(e.to_string())
    }
}
