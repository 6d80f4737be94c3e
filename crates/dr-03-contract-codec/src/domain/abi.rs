//! # ABI Words
//!
//! Head/tail encoding of the handful of Solidity types the registry uses,
//! plus a bounds-checked reader for return data.
//!
//! ## Layout
//!
//! - static values occupy one 32-byte word (numbers left-padded)
//! - a `string` puts an offset in the head; the tail holds its length word
//!   and the UTF-8 bytes right-padded to a word boundary
//! - a tuple containing a dynamic member is itself dynamic

use super::errors::AbiError;
use sha3::{Digest, Keccak256};
use shared_types::{Address, Hash, U256};

pub const WORD: usize = 32;

// =============================================================================
// SIGNATURES
// =============================================================================

/// Solidity parameter types understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Bytes32,
    Uint256,
    Bool,
    Address,
    String,
}

impl ParamKind {
    /// Canonical type name as it appears in signatures and ABI JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Bytes32 => "bytes32",
            ParamKind::Uint256 => "uint256",
            ParamKind::Bool => "bool",
            ParamKind::Address => "address",
            ParamKind::String => "string",
        }
    }
}

/// A contract function: name and input types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub inputs: &'static [ParamKind],
}

impl FunctionSpec {
    /// `name(type1,type2,...)`
    pub fn signature(&self) -> String {
        let inputs: Vec<&str> = self.inputs.iter().map(ParamKind::as_str).collect();
        format!("{}({})", self.name, inputs.join(","))
    }

    pub fn selector(&self) -> [u8; 4] {
        selector(&self.signature())
    }
}

/// First four bytes of Keccak256 over a canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

// =============================================================================
// ENCODING
// =============================================================================

/// A value to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    FixedBytes(Hash),
    Uint(U256),
    Bool(bool),
    Address(Address),
    String(String),
    Tuple(Vec<Token>),
}

impl Token {
    fn is_dynamic(&self) -> bool {
        match self {
            Token::String(_) => true,
            Token::Tuple(members) => members.iter().any(Token::is_dynamic),
            _ => false,
        }
    }

    fn head_len(&self) -> usize {
        match self {
            _ if self.is_dynamic() => WORD,
            Token::Tuple(members) => members.iter().map(Token::head_len).sum(),
            _ => WORD,
        }
    }
}

/// `selector ‖ encode(tokens)`
pub fn encode_call(selector: [u8; 4], tokens: &[Token]) -> Vec<u8> {
    let mut out = selector.to_vec();
    out.extend(encode_tokens(tokens));
    out
}

/// Encode a sequence of tokens as the members of one tuple.
pub fn encode_tokens(tokens: &[Token]) -> Vec<u8> {
    let head_size: usize = tokens.iter().map(Token::head_len).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(&uint_word(U256::from(head_size + tail.len())));
            tail.extend(encode_dynamic(token));
        } else {
            head.extend(encode_static(token));
        }
    }

    head.extend(tail);
    head
}

fn encode_static(token: &Token) -> Vec<u8> {
    match token {
        Token::FixedBytes(bytes) => bytes.to_vec(),
        Token::Uint(value) => uint_word(*value).to_vec(),
        Token::Bool(flag) => uint_word(U256::from(u8::from(*flag))).to_vec(),
        Token::Address(address) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(address);
            word.to_vec()
        }
        Token::Tuple(members) => encode_tokens(members),
        Token::String(_) => encode_dynamic(token),
    }
}

fn encode_dynamic(token: &Token) -> Vec<u8> {
    match token {
        Token::String(text) => {
            let bytes = text.as_bytes();
            let mut out = uint_word(U256::from(bytes.len())).to_vec();
            out.extend_from_slice(bytes);
            out.resize(WORD + padded_len(bytes.len()), 0);
            out
        }
        Token::Tuple(members) => encode_tokens(members),
        _ => encode_static(token),
    }
}

fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

// =============================================================================
// DECODING
// =============================================================================

/// Reads head slots from ABI data. Offsets are relative to the start of
/// the reader's data, so a tuple gets its own reader.
#[derive(Debug, Clone, Copy)]
pub struct AbiReader<'a> {
    data: &'a [u8],
}

impl<'a> AbiReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn bytes_at(&self, start: usize, len: usize) -> Result<&'a [u8], AbiError> {
        let end = start
            .checked_add(len)
            .ok_or_else(|| AbiError::InvalidOffset(format!("{start}+{len}")))?;
        self.data.get(start..end).ok_or(AbiError::Truncated {
            needed: end,
            available: self.data.len(),
        })
    }

    fn word(&self, slot: usize) -> Result<&'a [u8], AbiError> {
        self.bytes_at(slot * WORD, WORD)
    }

    fn offset_at(&self, position: usize) -> Result<usize, AbiError> {
        let value = U256::from_big_endian(self.bytes_at(position, WORD)?);
        if value > U256::from(self.data.len()) {
            return Err(AbiError::InvalidOffset(value.to_string()));
        }
        Ok(value.as_usize())
    }

    pub fn uint(&self, slot: usize) -> Result<U256, AbiError> {
        Ok(U256::from_big_endian(self.word(slot)?))
    }

    pub fn u64(&self, slot: usize) -> Result<u64, AbiError> {
        let value = self.uint(slot)?;
        if value > U256::from(u64::MAX) {
            return Err(AbiError::ValueOutOfRange("u64"));
        }
        Ok(value.low_u64())
    }

    pub fn bool(&self, slot: usize) -> Result<bool, AbiError> {
        let value = self.uint(slot)?;
        if value == U256::zero() {
            Ok(false)
        } else if value == U256::one() {
            Ok(true)
        } else {
            Err(AbiError::InvalidBool)
        }
    }

    pub fn bytes32(&self, slot: usize) -> Result<Hash, AbiError> {
        let mut out = [0u8; WORD];
        out.copy_from_slice(self.word(slot)?);
        Ok(out)
    }

    pub fn address(&self, slot: usize) -> Result<Address, AbiError> {
        let word = self.word(slot)?;
        if word[..12].iter().any(|&b| b != 0) {
            return Err(AbiError::InvalidAddress);
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&word[12..]);
        Ok(out)
    }

    /// Follow the head offset in `slot` to a length-prefixed string.
    pub fn string(&self, slot: usize) -> Result<String, AbiError> {
        let offset = self.offset_at(slot * WORD)?;
        let len = self.offset_at(offset)?;
        let bytes = self.bytes_at(offset + WORD, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::InvalidUtf8)
    }

    /// Follow the head offset in `slot` to a dynamic tuple.
    pub fn tuple(&self, slot: usize) -> Result<AbiReader<'a>, AbiError> {
        let offset = self.offset_at(slot * WORD)?;
        Ok(AbiReader::new(&self.data[offset..]))
    }
}
