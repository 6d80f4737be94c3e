//! # Return Data Decoders
//!
//! `getDocument` returns a struct, which the ABI encodes as a dynamic tuple
//! behind a single head offset. A missing document is not an error on
//! chain: the contract returns a zeroed record, so "not found" is
//! detected from the data and reported as `Ok(None)`.

use super::abi::{AbiReader, WORD};
use super::errors::AbiError;
use shared_types::{Address, Hash, ZERO_ADDRESS, ZERO_HASH};

/// `Error(string)`
const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];
/// `Panic(uint256)`
const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// On-chain view of a V1 registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub document_id: Hash,
    pub issuer: Address,
    pub document_hash: Hash,
    pub document_type: String,
    pub issued_at: u64,
    /// 0 = no expiry.
    pub expiry_date: u64,
    pub revoked: bool,
    /// Set when this record was created by a reissue.
    pub previous_version: Option<Hash>,
}

/// On-chain view of a V2 registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecordV2 {
    pub document_type: String,
    pub document_number: String,
    pub document_title: String,
    pub issued_date: u64,
    pub effective_from: u64,
    pub effective_until: u64,
    pub expiry_date: u64,
    pub is_permanent: bool,
    pub issuer_name: String,
    pub issuer_country: String,
    pub issuer_registration_number: String,
    pub holder_full_name: String,
    pub holder_id_number: String,
    pub holder_nationality: String,
    pub ipfs_hash: Option<String>,
    pub pdf_hash: Hash,
    pub issuer: Address,
    pub revoked: bool,
    pub registered_at: u64,
}

fn is_blank(data: &[u8]) -> bool {
    data.iter().all(|&b| b == 0)
}

/// Decode `getDocument` return data from the V1 contract.
pub fn decode_document(data: &[u8]) -> Result<Option<DocumentRecord>, AbiError> {
    if is_blank(data) {
        return Ok(None);
    }

    let record = AbiReader::new(data).tuple(0)?;
    let issuer = record.address(1)?;
    if issuer == ZERO_ADDRESS {
        return Ok(None);
    }

    let previous = record.bytes32(7)?;
    Ok(Some(DocumentRecord {
        document_id: record.bytes32(0)?,
        issuer,
        document_hash: record.bytes32(2)?,
        document_type: record.string(3)?,
        issued_at: record.u64(4)?,
        expiry_date: record.u64(5)?,
        revoked: record.bool(6)?,
        previous_version: (previous != ZERO_HASH).then_some(previous),
    }))
}

/// Decode `getDocument` return data from the V2 contract.
pub fn decode_document_v2(data: &[u8]) -> Result<Option<DocumentRecordV2>, AbiError> {
    if is_blank(data) {
        return Ok(None);
    }

    let r = AbiReader::new(data).tuple(0)?;
    let document_number = r.string(1)?;
    if document_number.is_empty() {
        return Ok(None);
    }

    let ipfs_hash = r.string(14)?;
    Ok(Some(DocumentRecordV2 {
        document_type: r.string(0)?,
        document_number,
        document_title: r.string(2)?,
        issued_date: r.u64(3)?,
        effective_from: r.u64(4)?,
        effective_until: r.u64(5)?,
        expiry_date: r.u64(6)?,
        is_permanent: r.bool(7)?,
        issuer_name: r.string(8)?,
        issuer_country: r.string(9)?,
        issuer_registration_number: r.string(10)?,
        holder_full_name: r.string(11)?,
        holder_id_number: r.string(12)?,
        holder_nationality: r.string(13)?,
        ipfs_hash: (!ipfs_hash.is_empty()).then_some(ipfs_hash),
        pdf_hash: r.bytes32(15)?,
        issuer: r.address(16)?,
        revoked: r.bool(17)?,
        registered_at: r.u64(18)?,
    }))
}

/// Decode a single `bool` return value.
pub fn decode_bool(data: &[u8]) -> Result<bool, AbiError> {
    AbiReader::new(data).bool(0)
}

/// Extract a human-readable reason from revert data.
///
/// Handles `Error(string)` and `Panic(uint256)`; anything else yields `None`.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let (selector, body) = data.split_at(4);
    let reader = AbiReader::new(body);

    if selector == ERROR_SELECTOR {
        reader.string(0).ok()
    } else if selector == PANIC_SELECTOR && body.len() >= WORD {
        reader.uint(0).ok().map(|code| format!("panic code 0x{:x}", code))
    } else {
        None
    }
}
