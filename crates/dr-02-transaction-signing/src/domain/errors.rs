//! # Signing Errors

use dr_01_rlp::RlpError;
use thiserror::Error;

/// Errors that can occur while building, signing or parsing a transaction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    /// Private key is malformed, zero, or not below the curve order
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// The ECDSA backend refused to produce a signature
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// `chain_id * 2 + 35 + recovery_id` does not fit in a u64
    #[error("Chain id {0} too large for EIP-155 v")]
    ChainIdOverflow(u64),

    /// RLP encoding or decoding failed
    #[error("RLP error: {0}")]
    Encoding(#[from] RlpError),

    /// Raw bytes are not a legacy signed transaction
    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    /// `v` does not encode the expected chain id
    #[error("v = {v} does not match chain id {expected}")]
    ChainIdMismatch { expected: u64, v: u64 },

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,
}
