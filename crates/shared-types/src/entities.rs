//! # Core Primitive Entities
//!
//! Fixed-size primitives shared by the signing, codec, transport and
//! registry crates.

// Re-export U256 from primitive-types for use across all crates
pub use primitive_types::U256;

/// A 32-byte hash (SHA-256 content hash, Keccak-256 digest, document id).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// The all-zero hash. Used by the registry contract as "no value".
pub const ZERO_HASH: Hash = [0u8; 32];

/// The all-zero address.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// One gwei expressed in wei.
pub const GWEI: u64 = 1_000_000_000;

/// Convert a gwei amount to wei.
pub fn gwei_to_wei(gwei: u64) -> U256 {
    U256::from(gwei) * U256::from(GWEI)
}
