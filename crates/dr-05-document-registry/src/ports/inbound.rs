//! # Inbound Ports (Driving Ports / API)
//!
//! The operations the surrounding application calls. Implementations must
//! be thread-safe (`Send + Sync`).

use crate::domain::entities::{
    ContentCheck, RegisterRequest, RegisterV2Request, ReissueRequest, SubmittedTransaction,
    TransactionStatus, VerifyOutcome,
};
use crate::domain::errors::RegistryError;
use async_trait::async_trait;
use dr_03_contract_codec::{DocumentRecord, DocumentRecordV2};

/// Primary Document Registry API.
#[async_trait]
pub trait DocumentRegistryApi: Send + Sync {
    // =========================================================================
    // Writes (signed transactions, never wait for mining)
    // =========================================================================

    /// Anchor a document hash.
    async fn register(&self, request: RegisterRequest)
        -> Result<SubmittedTransaction, RegistryError>;

    /// Mark a document revoked. `reason` is logged only.
    async fn revoke(
        &self,
        document_id: &str,
        reason: &str,
    ) -> Result<SubmittedTransaction, RegistryError>;

    /// Revoke a document and register its successor in one transaction.
    async fn reissue(&self, request: ReissueRequest)
        -> Result<SubmittedTransaction, RegistryError>;

    /// Anchor a document with full metadata in the V2 registry.
    async fn register_v2(
        &self,
        request: RegisterV2Request,
    ) -> Result<SubmittedTransaction, RegistryError>;

    // =========================================================================
    // Reads
    // =========================================================================

    async fn verify(&self, document_id: &str)
        -> Result<VerifyOutcome<DocumentRecord>, RegistryError>;

    /// Registered, not revoked, not expired.
    async fn is_valid(&self, document_id: &str) -> Result<bool, RegistryError>;

    async fn document_metadata(
        &self,
        document_id: &str,
    ) -> Result<VerifyOutcome<DocumentRecordV2>, RegistryError>;

    /// Hash `content` and compare it with the anchored hash.
    async fn verify_content(
        &self,
        document_id: &str,
        content: &[u8],
    ) -> Result<ContentCheck, RegistryError>;

    /// Map a transaction receipt to a status. Unreachable nodes read as pending.
    async fn check_status(&self, tx_hash: &str) -> Result<TransactionStatus, RegistryError>;
}
