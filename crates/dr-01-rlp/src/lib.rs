//! # RLP Encoding (DR-01)
//!
//! Ethereum's Recursive Length Prefix serialization for byte strings and
//! nested lists.
//!
//! ## Rules
//!
//! | Payload | Encoding |
//! |---------|----------|
//! | single byte `< 0x80` | the byte itself |
//! | string, length `< 56` | `0x80 + len` ‖ bytes |
//! | string, length `>= 56` | `0xb7 + len(len)` ‖ big-endian len ‖ bytes |
//! | list, payload `< 56` | `0xc0 + len` ‖ items |
//! | list, payload `>= 56` | `0xf7 + len(len)` ‖ big-endian len ‖ items |
//!
//! Integers are encoded as their minimal big-endian byte string (zero is the
//! empty string). The decoder is strict: it rejects trailing bytes,
//! truncated input, and non-canonical prefixes.

pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod item;

pub use decoder::decode;
pub use encoder::{encode, encode_list};
pub use errors::RlpError;
pub use item::RlpItem;
