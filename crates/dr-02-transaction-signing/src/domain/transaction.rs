//! # Legacy Transactions (EIP-155)
//!
//! The signing state machine is carried by the types:
//! [`UnsignedTransaction`] produces a [`SigningHash`], which a key turns into
//! a [`SignedTransaction`]. A signed transaction can only exist with a valid
//! `v`, canonical `r`/`s`, and its serialized bytes.

use super::ecdsa::{keccak256, recover_address, sign_prehash, RecoverableSignature};
use super::errors::SigningError;
use super::keys::KeyMaterial;
use dr_01_rlp::{decode, encode_list, RlpItem};
use shared_types::{encode_hex, Address, Hash, U256};

/// Added to `chain_id * 2` for EIP-155 `v`.
const EIP155_V_OFFSET: u64 = 35;

// =============================================================================
// UNSIGNED
// =============================================================================

/// A legacy transaction before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: U256,
    /// `None` for contract creation.
    pub to: Option<Address>,
    pub value: U256,
    /// ABI-encoded call data.
    pub data: Vec<u8>,
}

impl UnsignedTransaction {
    /// The first six fields in RLP order.
    fn rlp_fields(&self) -> Vec<RlpItem> {
        vec![
            RlpItem::u64(self.nonce),
            RlpItem::uint(self.gas_price),
            RlpItem::uint(self.gas_limit),
            match self.to {
                Some(to) => RlpItem::bytes(to.to_vec()),
                None => RlpItem::empty(),
            },
            RlpItem::uint(self.value),
            RlpItem::bytes(self.data.clone()),
        ]
    }

    /// Compute the EIP-155 signing preimage and its Keccak256 hash.
    pub fn signing_hash(&self, chain_id: u64) -> Result<SigningHash, SigningError> {
        let mut fields = self.rlp_fields();
        fields.extend([RlpItem::u64(chain_id), RlpItem::empty(), RlpItem::empty()]);
        let preimage = encode_list(&fields)?;
        let hash = keccak256(&preimage);

        Ok(SigningHash {
            tx: self.clone(),
            chain_id,
            preimage,
            hash,
        })
    }
}

// =============================================================================
// SIGNING HASH
// =============================================================================

/// A transaction bound to a chain id, ready to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningHash {
    tx: UnsignedTransaction,
    chain_id: u64,
    preimage: Vec<u8>,
    hash: Hash,
}

impl SigningHash {
    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    /// `rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0])`
    pub fn preimage(&self) -> &[u8] {
        &self.preimage
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign with `key` and serialize the result.
    pub fn sign(self, key: &KeyMaterial) -> Result<SignedTransaction, SigningError> {
        let signature = sign_prehash(key.signing_key(), &self.hash)?;
        let v = eip155_v(self.chain_id, signature.recovery_id)?;
        SignedTransaction::assemble(self.tx, self.chain_id, v, signature.r, signature.s)
    }
}

/// `v = recovery_id + chain_id * 2 + 35`, overflow-checked.
pub fn eip155_v(chain_id: u64, recovery_id: u8) -> Result<u64, SigningError> {
    chain_id
        .checked_mul(2)
        .and_then(|v| v.checked_add(EIP155_V_OFFSET))
        .and_then(|v| v.checked_add(u64::from(recovery_id)))
        .ok_or(SigningError::ChainIdOverflow(chain_id))
}

// =============================================================================
// SIGNED
// =============================================================================

/// `recovery_id` encoded by `v` for `chain_id`, or `ChainIdMismatch`.
pub fn recovery_id_from_v(chain_id: u64, v: u64) -> Result<u8, SigningError> {
    let base = eip155_v(chain_id, 0)?;
    match v.checked_sub(base) {
        Some(recovery_id @ (0 | 1)) => Ok(recovery_id as u8),
        _ => Err(SigningError::ChainIdMismatch {
            expected: chain_id,
            v,
        }),
    }
}

/// A signed legacy transaction with its broadcast bytes.
///
/// Fields are read-only: `raw` and `hash` are derived from the others once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: UnsignedTransaction,
    chain_id: u64,
    v: u64,
    recovery_id: u8,
    r: [u8; 32],
    s: [u8; 32],
    raw: Vec<u8>,
    hash: Hash,
}

impl SignedTransaction {
    fn assemble(
        tx: UnsignedTransaction,
        chain_id: u64,
        v: u64,
        r: [u8; 32],
        s: [u8; 32],
    ) -> Result<Self, SigningError> {
        let recovery_id = recovery_id_from_v(chain_id, v)?;
        let mut fields = tx.rlp_fields();
        fields.extend([RlpItem::u64(v), RlpItem::scalar(&r), RlpItem::scalar(&s)]);
        let raw = encode_list(&fields)?;
        let hash = keccak256(&raw);

        Ok(Self {
            tx,
            chain_id,
            v,
            recovery_id,
            r,
            s,
            raw,
            hash,
        })
    }

    pub fn tx(&self) -> &UnsignedTransaction {
        &self.tx
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn v(&self) -> u64 {
        self.v
    }

    /// Left-padded to 32 bytes; serialized without leading zeros.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Serialized bytes for `eth_sendRawTransaction`.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// `0x`-prefixed lowercase hex of [`Self::raw`].
    pub fn raw_hex(&self) -> String {
        encode_hex(&self.raw)
    }

    /// Keccak256 of the raw bytes; the hash the network will report.
    pub fn tx_hash(&self) -> Hash {
        self.hash
    }

    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Recover the address that produced this signature.
    pub fn recover_sender(&self) -> Result<Address, SigningError> {
        let signing_hash = self.tx.signing_hash(self.chain_id)?;
        let signature = RecoverableSignature {
            r: self.r,
            s: self.s,
            recovery_id: self.recovery_id(),
        };
        recover_address(signing_hash.hash(), &signature)
    }

    /// Parse a raw legacy EIP-155 transaction signed for `chain_id`.
    pub fn decode_raw(raw: &[u8], chain_id: u64) -> Result<Self, SigningError> {
        let item = decode(raw)?;
        let fields = item.as_list()?;
        if fields.len() != 9 {
            return Err(SigningError::MalformedTransaction(format!(
                "expected 9 fields, got {}",
                fields.len()
            )));
        }

        let to = match fields[3].as_bytes()? {
            [] => None,
            bytes if bytes.len() == 20 => {
                let mut address = [0u8; 20];
                address.copy_from_slice(bytes);
                Some(address)
            }
            bytes => {
                return Err(SigningError::MalformedTransaction(format!(
                    "recipient must be 20 bytes, got {}",
                    bytes.len()
                )))
            }
        };

        let tx = UnsignedTransaction {
            nonce: fields[0].as_u64()?,
            gas_price: fields[1].as_uint()?,
            gas_limit: fields[2].as_uint()?,
            to,
            value: fields[4].as_uint()?,
            data: fields[5].as_bytes()?.to_vec(),
        };

        let v = fields[6].as_u64()?;
        recovery_id_from_v(chain_id, v)?;

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        fields[7].as_uint()?.to_big_endian(&mut r);
        fields[8].as_uint()?.to_big_endian(&mut s);

        Self::assemble(tx, chain_id, v, r, s)
    }
}
