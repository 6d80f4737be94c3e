//! # RLP Encoder

use crate::errors::RlpError;
use crate::item::{trim_leading_zeros, RlpItem};

const STRING_OFFSET: u8 = 0x80;
const LIST_OFFSET: u8 = 0xc0;
/// Payloads shorter than this use the single-byte short form.
const SHORT_LIMIT: usize = 56;

// =============================================================================
// ENCODING
// =============================================================================

/// RLP-encode an item.
pub fn encode(item: &RlpItem) -> Result<Vec<u8>, RlpError> {
    let mut out = Vec::new();
    encode_into(item, &mut out)?;
    Ok(out)
}

/// RLP-encode a slice of items as one list.
pub fn encode_list(items: &[RlpItem]) -> Result<Vec<u8>, RlpError> {
    let mut payload = Vec::new();
    for item in items {
        encode_into(item, &mut payload)?;
    }
    let mut out = length_prefix(payload.len() as u128, LIST_OFFSET)?;
    out.extend_from_slice(&payload);
    Ok(out)
}

fn encode_into(item: &RlpItem, out: &mut Vec<u8>) -> Result<(), RlpError> {
    match item {
        RlpItem::Bytes(data) => {
            if data.len() == 1 && data[0] < STRING_OFFSET {
                out.push(data[0]);
            } else {
                out.extend(length_prefix(data.len() as u128, STRING_OFFSET)?);
                out.extend_from_slice(data);
            }
        }
        RlpItem::List(items) => out.extend(encode_list(items)?),
    }
    Ok(())
}

/// Header for a payload of `len` bytes.
///
/// Short form: `offset + len`. Long form: `offset + 55 + len(lenBytes)`
/// followed by the minimal big-endian length.
pub(crate) fn length_prefix(len: u128, offset: u8) -> Result<Vec<u8>, RlpError> {
    if len < SHORT_LIMIT as u128 {
        return Ok(vec![offset + len as u8]);
    }
    let len = u64::try_from(len).map_err(|_| RlpError::PayloadTooLarge { length: len })?;
    let len_bytes = encode_length(len);
    let mut header = Vec::with_capacity(1 + len_bytes.len());
    header.push(offset + 55 + len_bytes.len() as u8);
    header.extend_from_slice(len_bytes.as_slice());
    Ok(header)
}

/// Encode a length as minimal big-endian bytes.
fn encode_length(len: u64) -> Vec<u8> {
    trim_leading_zeros(&len.to_be_bytes()).to_vec()
}
