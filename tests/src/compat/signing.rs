//! # EIP-155 Signatures vs `secp256k1`
//!
//! Signatures produced with k256 are recovered with libsecp256k1, and both
//! libraries must agree on the deterministic (RFC 6979) signature itself.
//! Hashes are checked against `sha3` directly and signatures against a plain
//! k256 verifying key.

#[cfg(test)]
mod tests {
    use dr_02_transaction_signing::{keccak256, KeyMaterial, SignedTransaction, UnsignedTransaction};
    use k256::ecdsa::signature::hazmat::PrehashVerifier;
    use k256::ecdsa::{Signature, VerifyingKey};
    use proptest::prelude::*;
    use rand::RngCore;
    use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
    use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
    use sha3::{Digest, Keccak256};
    use shared_types::{Address, U256};

    const CHAIN_ID: u64 = 11_155_111;

    fn transaction(nonce: u64, data: Vec<u8>) -> UnsignedTransaction {
        UnsignedTransaction {
            nonce,
            gas_price: U256::from(20_000_000_000u64),
            gas_limit: U256::from(300_000u64),
            to: Some([0x35; 20]),
            value: U256::zero(),
            data,
        }
    }

    fn address_of(public_key: &PublicKey) -> Address {
        let hash = keccak256(&public_key.serialize_uncompressed()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        address
    }

    fn reference_recover(signed: &SignedTransaction) -> Address {
        let hash = *signed.tx().signing_hash(signed.chain_id()).unwrap().hash();
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(signed.r());
        compact[32..].copy_from_slice(signed.s());
        let recovery_id = RecoveryId::from_i32(i32::from(signed.recovery_id())).unwrap();
        let signature = RecoverableSignature::from_compact(&compact, recovery_id).unwrap();

        let public_key = Secp256k1::verification_only()
            .recover_ecdsa(&Message::from_digest(hash), &signature)
            .unwrap();
        address_of(&public_key)
    }

    #[test]
    fn test_reference_library_recovers_sender() {
        let key = KeyMaterial::from_hex(
            "0x4646464646464646464646464646464646464646464646464646464646464646",
        )
        .unwrap();
        let signed = transaction(9, vec![0x01, 0x02])
            .signing_hash(CHAIN_ID)
            .unwrap()
            .sign(&key)
            .unwrap();

        assert_eq!(reference_recover(&signed), key.address());
    }

    #[test]
    fn test_tx_hash_is_keccak_of_raw_bytes() {
        let key = KeyMaterial::from_hex(
            "0x4646464646464646464646464646464646464646464646464646464646464646",
        )
        .unwrap();
        let signing_hash = transaction(1, vec![0xab; 68]).signing_hash(CHAIN_ID).unwrap();
        let expected_signing: [u8; 32] = Keccak256::digest(signing_hash.preimage()).into();
        assert_eq!(*signing_hash.hash(), expected_signing);

        let signed = signing_hash.sign(&key).unwrap();
        let expected_tx: [u8; 32] = Keccak256::digest(signed.raw()).into();
        assert_eq!(signed.tx_hash(), expected_tx);
    }

    /// Test: r and s verify as a standard low-s ECDSA signature
    #[test]
    fn test_signature_verifies_with_k256() {
        let secret = [0x46u8; 32];
        let key = KeyMaterial::from_bytes(&secret).unwrap();
        let signing_hash = transaction(2, vec![0x01]).signing_hash(CHAIN_ID).unwrap();
        let hash = *signing_hash.hash();
        let signed = signing_hash.sign(&key).unwrap();

        let public_key = SecretKey::from_slice(&secret)
            .unwrap()
            .public_key(&Secp256k1::new());
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&public_key.serialize_uncompressed()).unwrap();

        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(signed.r());
        compact[32..].copy_from_slice(signed.s());
        let signature = Signature::from_slice(&compact).unwrap();

        assert!(signature.normalize_s().is_none());
        assert!(verifying_key.verify_prehash(&hash, &signature).is_ok());
        assert!(verifying_key.verify_prehash(&keccak256(b"other"), &signature).is_err());
    }

    #[test]
    fn test_derived_address_matches_reference() {
        let secp = Secp256k1::new();
        let mut secret = [0u8; 32];
        for _ in 0..8 {
            rand::thread_rng().fill_bytes(&mut secret);
            let Ok(secret_key) = SecretKey::from_slice(&secret) else {
                continue;
            };
            let key = KeyMaterial::from_bytes(&secret).unwrap();
            assert_eq!(key.address(), address_of(&secret_key.public_key(&secp)));
        }
    }

    proptest! {
        #[test]
        fn prop_keccak_matches_sha3(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let expected: [u8; 32] = Keccak256::digest(&data).into();
            prop_assert_eq!(keccak256(&data), expected);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Both libraries derive the same nonce, so r, s and the recovery
        /// id must be identical.
        #[test]
        fn prop_signatures_identical_to_reference(
            secret in proptest::array::uniform32(1u8..),
            nonce in any::<u64>(),
            data in proptest::collection::vec(any::<u8>(), 0..100),
        ) {
            let key = KeyMaterial::from_bytes(&secret).unwrap();
            let signing_hash = transaction(nonce, data).signing_hash(CHAIN_ID).unwrap();
            let hash = *signing_hash.hash();
            let signed = signing_hash.sign(&key).unwrap();

            let secp = Secp256k1::signing_only();
            let secret_key = SecretKey::from_slice(&secret).unwrap();
            let (recovery_id, compact) = secp
                .sign_ecdsa_recoverable(&Message::from_digest(hash), &secret_key)
                .serialize_compact();

            prop_assert_eq!(&compact[..32], &signed.r()[..]);
            prop_assert_eq!(&compact[32..], &signed.s()[..]);
            prop_assert_eq!(recovery_id.to_i32(), i32::from(signed.recovery_id()));
            prop_assert_eq!(reference_recover(&signed), key.address());
        }
    }
}
