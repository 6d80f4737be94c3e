//! # ECDSA (secp256k1)
//!
//! Prehash signing, public key recovery, and Ethereum address derivation.
//!
//! ## Security Notes
//!
//! - **Deterministic nonces**: `k256` signs with RFC6979, so the same
//!   transaction and key always give the same `(r, s)`
//! - **Malleability (EIP-2)**: `s` is normalized to the lower half of the
//!   curve order; the recovery parity is flipped when that happens
//! - **Constant-Time Operations**: the low-s check uses `subtle`

use super::errors::SigningError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use shared_types::{Address, Hash};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

/// secp256k1 curve order n
/// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// floor(n / 2)
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// A recoverable signature: `r`, `s` left-padded to 32 bytes and the y-parity
/// of the nonce point (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub recovery_id: u8,
}

// =============================================================================
// SIGNING & RECOVERY
// =============================================================================

/// Sign a 32-byte prehash, returning a low-s signature and its recovery id.
///
/// k256 already normalizes `s` and adjusts the recovery id. The low-s check
/// below is a guard that only fires if that backend behaviour changes.
pub fn sign_prehash(key: &SigningKey, prehash: &Hash) -> Result<RecoverableSignature, SigningError> {
    let (signature, recid) = key
        .sign_prehash_recoverable(prehash)
        .map_err(|e| SigningError::SigningFailed(e.to_string()))?;

    // Ethereum's v cannot express an x-reduced nonce point.
    if recid.is_x_reduced() {
        return Err(SigningError::SigningFailed(
            "x-reduced recovery id".to_string(),
        ));
    }

    let sig_bytes = signature.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig_bytes[..32]);
    s.copy_from_slice(&sig_bytes[32..]);

    let mut recovery_id = u8::from(recid.is_y_odd());
    // unreachable with k256 0.13
    if !is_low_s(&s) {
        s = invert_s(&s);
        recovery_id ^= 1;
    }

    Ok(RecoverableSignature { r, s, recovery_id })
}

/// Recover the signer's address from a prehash and signature.
pub fn recover_address(
    prehash: &Hash,
    signature: &RecoverableSignature,
) -> Result<Address, SigningError> {
    if signature.recovery_id > 1 {
        return Err(SigningError::RecoveryFailed);
    }

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|_| SigningError::RecoveryFailed)?;

    let recid = RecoveryId::new(signature.recovery_id == 1, false);
    let key = VerifyingKey::recover_from_prehash(prehash, &sig, recid)
        .map_err(|_| SigningError::RecoveryFailed)?;

    Ok(address_from_pubkey(&key))
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Derive an Ethereum address: last 20 bytes of Keccak256 over the
/// uncompressed public key without its `0x04` tag.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// `s <= n/2`, compared in constant time.
pub fn is_low_s(s: &[u8; 32]) -> bool {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for (s_byte, h_byte) in s.iter().zip(SECP256K1_HALF_ORDER.iter()) {
        let not_decided = !(less | greater);
        let byte_equal = s_byte.ct_eq(h_byte);
        let byte_less = Choice::from((s_byte < h_byte) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & !byte_less & !byte_equal;
    }

    (!greater).into()
}

/// `n - s`, the high/low counterpart of a signature scalar.
pub fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;

    for i in (0..32).rev() {
        let diff = (SECP256K1_ORDER[i] as i32) - (s[i] as i32) - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}
