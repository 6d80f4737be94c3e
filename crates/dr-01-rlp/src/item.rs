//! # RLP Items
//!
//! The two shapes RLP knows about, plus integer conversions in the
//! canonical (minimal big-endian) form.

use crate::errors::RlpError;
use shared_types::U256;

/// A decoded or to-be-encoded RLP value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    /// A byte string.
    Bytes(Vec<u8>),
    /// A list of nested items.
    List(Vec<RlpItem>),
}

impl RlpItem {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        RlpItem::Bytes(data.into())
    }

    pub fn list(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }

    /// Empty byte string (`0x80`).
    pub fn empty() -> Self {
        RlpItem::Bytes(Vec::new())
    }

    /// Integer as minimal big-endian bytes. Zero is the empty string.
    pub fn u64(value: u64) -> Self {
        RlpItem::Bytes(trim_leading_zeros(&value.to_be_bytes()).to_vec())
    }

    /// 256-bit integer as minimal big-endian bytes.
    pub fn uint(value: U256) -> Self {
        let mut buf = [0u8; 32];
        value.to_big_endian(&mut buf);
        RlpItem::Bytes(trim_leading_zeros(&buf).to_vec())
    }

    /// Big-endian scalar with leading zeros removed (e.g. signature `r`/`s`).
    pub fn scalar(be_bytes: &[u8]) -> Self {
        RlpItem::Bytes(trim_leading_zeros(be_bytes).to_vec())
    }

    pub fn as_bytes(&self) -> Result<&[u8], RlpError> {
        match self {
            RlpItem::Bytes(data) => Ok(data),
            RlpItem::List(_) => Err(RlpError::ExpectedBytes),
        }
    }

    pub fn as_list(&self) -> Result<&[RlpItem], RlpError> {
        match self {
            RlpItem::List(items) => Ok(items),
            RlpItem::Bytes(_) => Err(RlpError::ExpectedList),
        }
    }

    /// Read a canonical integer into a `u64`.
    pub fn as_u64(&self) -> Result<u64, RlpError> {
        let data = canonical_integer(self.as_bytes()?)?;
        if data.len() > 8 {
            return Err(RlpError::IntegerOverflow { bits: 64 });
        }
        Ok(data.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }

    /// Read a canonical integer into a `U256`.
    pub fn as_uint(&self) -> Result<U256, RlpError> {
        let data = canonical_integer(self.as_bytes()?)?;
        if data.len() > 32 {
            return Err(RlpError::IntegerOverflow { bits: 256 });
        }
        Ok(U256::from_big_endian(data))
    }
}

fn canonical_integer(data: &[u8]) -> Result<&[u8], RlpError> {
    if data.first() == Some(&0) {
        return Err(RlpError::NonCanonical("integer with leading zero"));
    }
    Ok(data)
}

pub(crate) fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}
