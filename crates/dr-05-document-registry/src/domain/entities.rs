//! # Domain Entities
//!
//! Requests accepted by the service and the outcomes it reports. Request
//! fields are the caller's raw strings; they are validated at the service
//! boundary.

use shared_types::{Address, Hash};
use std::collections::BTreeMap;

/// Anchor a new document in the V1 registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterRequest {
    /// `0x` + 64 hex characters.
    pub document_id: String,
    /// SHA-256 of the file, 64 hex characters, prefix optional.
    pub document_hash: String,
    pub document_type: String,
    /// Unix seconds; `None` for documents that never expire.
    pub expiry_date: Option<u64>,
    /// Descriptive fields kept off chain. Only the keys are logged.
    pub metadata: BTreeMap<String, String>,
}

/// Replace a document with a new version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReissueRequest {
    pub old_document_id: String,
    pub new_document_id: String,
    pub new_document_hash: String,
    pub document_type: String,
    pub expiry_date: Option<u64>,
}

/// Anchor a document with full metadata in the V2 registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterV2Request {
    pub document_id: String,
    pub document_type: String,
    pub document_number: String,
    pub document_title: String,
    pub issued_date: u64,
    pub effective_from: u64,
    pub effective_until: Option<u64>,
    pub expiry_date: Option<u64>,
    pub is_permanent: bool,
    pub issuer_name: String,
    pub issuer_country: String,
    pub issuer_registration_number: String,
    pub holder_full_name: String,
    pub holder_id_number: String,
    pub holder_nationality: String,
    pub ipfs_hash: Option<String>,
    /// SHA-256 of the rendered PDF, 64 hex characters.
    pub pdf_hash: String,
}

/// Where a submitted transaction stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Not mined yet, or the node could not be asked.
    Pending,
    Confirmed { block_number: u64 },
    /// Mined but reverted.
    Failed { block_number: u64 },
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Confirmed { .. } => "confirmed",
            TransactionStatus::Failed { .. } => "failed",
        }
    }
}

/// Receipt of a broadcast. The transaction is not mined yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub tx_hash: Hash,
    pub status: TransactionStatus,
    pub nonce: u64,
    pub contract: Address,
}

/// Result of a registry lookup. "Not found" is an answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome<T> {
    Found(T),
    NotFound,
}

impl<T> VerifyOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            VerifyOutcome::Found(record) => Some(record),
            VerifyOutcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, VerifyOutcome::Found(_))
    }
}

impl<T> From<Option<T>> for VerifyOutcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(record) => VerifyOutcome::Found(record),
            None => VerifyOutcome::NotFound,
        }
    }
}

/// Comparison of a file against the hash anchored on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentCheck {
    Match,
    Mismatch { on_chain: Hash, computed: Hash },
    NotFound,
}
