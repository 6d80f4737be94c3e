//! # RLP Decoder
//!
//! Strict decoder used to inspect signed payloads. Anything a canonical
//! encoder would not have produced is rejected.

use crate::errors::RlpError;
use crate::item::RlpItem;

/// Deepest list nesting accepted.
pub const MAX_DEPTH: usize = 64;

/// Decode exactly one item spanning the whole input.
pub fn decode(data: &[u8]) -> Result<RlpItem, RlpError> {
    let (item, consumed) = decode_item(data, 0)?;
    if consumed != data.len() {
        return Err(RlpError::TrailingBytes(data.len() - consumed));
    }
    Ok(item)
}

/// Decode one item from the front of `data`, returning it and its encoded size.
fn decode_item(data: &[u8], depth: usize) -> Result<(RlpItem, usize), RlpError> {
    if depth > MAX_DEPTH {
        return Err(RlpError::TooDeep(MAX_DEPTH));
    }
    let prefix = *data.first().ok_or(RlpError::UnexpectedEnd)?;

    match prefix {
        0x00..=0x7f => Ok((RlpItem::Bytes(vec![prefix]), 1)),
        0x80..=0xbf => {
            let (offset, len) = payload_bounds(data, 0x80)?;
            let payload = &data[offset..offset + len];
            if len == 1 && payload[0] < 0x80 {
                return Err(RlpError::NonCanonical("single byte wrapped in string header"));
            }
            Ok((RlpItem::Bytes(payload.to_vec()), offset + len))
        }
        0xc0..=0xff => {
            let (offset, len) = payload_bounds(data, 0xc0)?;
            let mut payload = &data[offset..offset + len];
            let mut items = Vec::new();
            while !payload.is_empty() {
                let (item, used) = decode_item(payload, depth + 1)?;
                items.push(item);
                payload = &payload[used..];
            }
            Ok((RlpItem::List(items), offset + len))
        }
    }
}

/// Returns `(header_len, payload_len)` and checks the payload is present.
fn payload_bounds(data: &[u8], offset: u8) -> Result<(usize, usize), RlpError> {
    let prefix = data[0];
    let short_max = offset + 55;

    let (header_len, payload_len) = if prefix <= short_max {
        (1, usize::from(prefix - offset))
    } else {
        let len_of_len = usize::from(prefix - short_max);
        let len_bytes = data.get(1..1 + len_of_len).ok_or(RlpError::UnexpectedEnd)?;
        if len_bytes[0] == 0 {
            return Err(RlpError::NonCanonical("length with leading zero"));
        }
        let mut len: u64 = 0;
        for &b in len_bytes {
            len = (len << 8) | u64::from(b);
        }
        if len < 56 {
            return Err(RlpError::NonCanonical("long form for short payload"));
        }
        let len = usize::try_from(len).map_err(|_| RlpError::UnexpectedEnd)?;
        (1 + len_of_len, len)
    };

    let end = header_len
        .checked_add(payload_len)
        .ok_or(RlpError::UnexpectedEnd)?;
    if end > data.len() {
        return Err(RlpError::UnexpectedEnd);
    }
    Ok((header_len, payload_len))
}
