//! # RLP Errors

use thiserror::Error;

/// Errors produced while encoding or decoding RLP.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RlpError {
    /// A payload length does not fit in the 8-byte length field.
    #[error("RLP payload too large: {length} bytes")]
    PayloadTooLarge { length: u128 },

    /// Input ended before the announced payload.
    #[error("Unexpected end of RLP input")]
    UnexpectedEnd,

    /// Bytes left over after the top-level item.
    #[error("Trailing bytes after RLP item: {0}")]
    TrailingBytes(usize),

    /// An encoding that a canonical encoder would never produce.
    #[error("Non-canonical RLP: {0}")]
    NonCanonical(&'static str),

    /// Nesting deeper than the decoder accepts.
    #[error("RLP nesting exceeds depth {0}")]
    TooDeep(usize),

    /// Expected a byte string, found a list.
    #[error("Expected RLP string, found list")]
    ExpectedBytes,

    /// Expected a list, found a byte string.
    #[error("Expected RLP list, found string")]
    ExpectedList,

    /// Integer wider than the target type.
    #[error("RLP integer overflows {bits}-bit target")]
    IntegerOverflow { bits: u32 },
}
