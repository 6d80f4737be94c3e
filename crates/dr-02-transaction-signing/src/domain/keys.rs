//! # Key Material
//!
//! The service's secp256k1 private key. The secret is wiped on drop
//! (`k256`'s `SigningKey` zeroizes its scalar) and never printed.

use super::ecdsa::address_from_pubkey;
use super::errors::SigningError;
use k256::ecdsa::SigningKey;
use shared_types::{encode_hex, strip_hex, Address};
use std::fmt;
use zeroize::Zeroizing;

/// A signing key together with its derived sender address.
pub struct KeyMaterial {
    signing_key: SigningKey,
    address: Address,
}

impl KeyMaterial {
    /// Build from a raw 32-byte big-endian scalar.
    ///
    /// Zero and values at or above the curve order are rejected.
    pub fn from_bytes(secret: &[u8; 32]) -> Result<Self, SigningError> {
        let signing_key = SigningKey::from_slice(secret)
            .map_err(|_| SigningError::InvalidKey("scalar out of range".to_string()))?;
        let address = address_from_pubkey(signing_key.verifying_key());
        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Parse a 64-character hex key, `0x` prefix optional.
    pub fn from_hex(value: &str) -> Result<Self, SigningError> {
        let body = strip_hex(value.trim());
        if body.len() != 64 {
            return Err(SigningError::InvalidKey(format!(
                "expected 64 hex characters, got {}",
                body.len()
            )));
        }

        let mut secret = Zeroizing::new([0u8; 32]);
        hex::decode_to_slice(body, secret.as_mut())
            .map_err(|_| SigningError::InvalidKey("not hex".to_string()))?;
        Self::from_bytes(&secret)
    }

    /// Sender address derived from the public key.
    pub fn address(&self) -> Address {
        self.address
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("address", &encode_hex(&self.address))
            .field("secret", &"<redacted>")
            .finish()
    }
}
