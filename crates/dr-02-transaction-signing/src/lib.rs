//! # Transaction Signing (DR-02)
//!
//! Builds, signs and serializes legacy Ethereum transactions with EIP-155
//! replay protection.
//!
//! ## Flow
//!
//! ```text
//! UnsignedTransaction --signing_hash(chain_id)--> SigningHash --sign(key)--> SignedTransaction
//! ```
//!
//! - the signing preimage is `rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0])`
//! - `v = recovery_id + chain_id * 2 + 35`
//! - the broadcast payload is `rlp([nonce, gasPrice, gas, to, value, data, v, r, s])`
//!
//! ## Security Notes
//!
//! - Signatures are deterministic (RFC6979) and normalized to low-s (EIP-2)
//! - [`KeyMaterial`] zeroizes its secret on drop and never prints it

pub mod domain;

pub use domain::ecdsa::{address_from_pubkey, keccak256};
pub use domain::errors::SigningError;
pub use domain::keys::KeyMaterial;
pub use domain::transaction::{SignedTransaction, SigningHash, UnsignedTransaction};
