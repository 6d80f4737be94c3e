//! # Hex & Hash Codec
//!
//! Content hashing (SHA-256) plus the hex conventions used on the wire:
//! `0x`-prefixed identifiers, fixed-size ids and hashes, and JSON-RPC
//! quantities.
//!
//! ## Invariants
//!
//! - `normalize_hex(normalize_hex(x)) == normalize_hex(x)`
//! - `strip_hex(strip_hex(x)) == strip_hex(x)`
//! - A parsed document id / tx hash is always exactly 32 bytes.

use crate::entities::{Address, Hash, U256};
use crate::errors::FormatError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use subtle::ConstantTimeEq;

// =============================================================================
// CONTENT HASHING
// =============================================================================

/// SHA-256 over raw bytes.
pub fn hash_content(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// SHA-256 of a file, streamed in 64 KiB chunks.
pub fn hash_file(path: impl AsRef<Path>) -> io::Result<Hash> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hasher.finalize().into())
}

/// Check content against an expected hex hash (prefix and case insensitive).
///
/// The comparison of the digests is constant-time.
pub fn verify_content_hash(data: &[u8], expected: &str) -> Result<bool, FormatError> {
    let expected = parse_content_hash(expected)?;
    let actual = hash_content(data);
    Ok(actual.ct_eq(&expected).into())
}

// =============================================================================
// PREFIX HANDLING
// =============================================================================

/// Ensure a `0x` prefix (an upper-case `0X` is rewritten to `0x`).
pub fn normalize_hex(value: &str) -> String {
    format!("0x{}", strip_hex(value))
}

/// Remove a leading `0x` / `0X` if present.
pub fn strip_hex(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Lowercase, `0x`-prefixed hex of arbitrary bytes.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode hex data with an optional prefix. `"0x"` decodes to an empty vec.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, FormatError> {
    hex::decode(strip_hex(value)).map_err(|_| FormatError::InvalidHex { field: "hex data" })
}

// =============================================================================
// FIXED-SIZE IDENTIFIERS
// =============================================================================

/// Parse a document id: `0x` followed by exactly 64 hex characters.
pub fn parse_document_id(value: &str) -> Result<Hash, FormatError> {
    parse_fixed::<32>(value, "document id", true)
}

/// Parse a transaction hash: same shape as a document id.
pub fn parse_tx_hash(value: &str) -> Result<Hash, FormatError> {
    parse_fixed::<32>(value, "transaction hash", true)
}

/// Parse a content hash: 64 hex characters, prefix optional.
pub fn parse_content_hash(value: &str) -> Result<Hash, FormatError> {
    parse_fixed::<32>(value, "content hash", false)
}

/// Parse a 20-byte address, prefix optional, checksum casing ignored.
pub fn parse_address(value: &str) -> Result<Address, FormatError> {
    parse_fixed::<20>(value, "address", false)
}

fn parse_fixed<const N: usize>(
    value: &str,
    field: &'static str,
    require_prefix: bool,
) -> Result<[u8; N], FormatError> {
    let body = strip_hex(value);
    if require_prefix && body.len() == value.len() {
        return Err(FormatError::MissingPrefix { field });
    }

    let expected = N * 2;
    if body.len() != expected {
        return Err(FormatError::InvalidLength {
            field,
            expected,
            actual: body.len(),
        });
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(body, &mut out).map_err(|_| FormatError::InvalidHex { field })?;
    Ok(out)
}

// =============================================================================
// JSON-RPC QUANTITIES
// =============================================================================

/// Format a quantity the way JSON-RPC expects (`0x0`, `0x1a`, no leading zeros).
pub fn format_quantity(value: U256) -> String {
    format!("0x{:x}", value)
}

/// Parse a JSON-RPC hex quantity into a `U256`.
pub fn parse_quantity(value: &str) -> Result<U256, FormatError> {
    let body = strip_hex(value);
    if body.is_empty() || body.len() > 64 {
        return Err(FormatError::InvalidQuantity(value.to_string()));
    }
    U256::from_str_radix(body, 16).map_err(|_| FormatError::InvalidQuantity(value.to_string()))
}

/// Parse a JSON-RPC hex quantity that must fit in a `u64`.
pub fn parse_quantity_u64(value: &str) -> Result<u64, FormatError> {
    let quantity = parse_quantity(value)?;
    if quantity > U256::from(u64::MAX) {
        return Err(FormatError::InvalidQuantity(value.to_string()));
    }
    Ok(quantity.low_u64())
}
