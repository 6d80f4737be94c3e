//! # Integration Test Flows
//!
//! `DocumentRegistryService` + `HttpChainClient` against the simulated node.
//!
//! ## Flows Tested:
//!
//! 1. **Register → status → verify**: the anchored hash reads back intact
//! 2. **Revoke / reissue**: state changes are visible through `verify` and
//!    `is_valid`
//! 3. **Failure modes**: on-chain reverts, rejected and hung broadcasts,
//!    unreachable nodes

#[cfg(test)]
mod tests {
    use super::super::node::{SendFault, SimulatedNode, CHAIN_ID, REGISTRY, REGISTRY_V2};
    use dr_02_transaction_signing::KeyMaterial;
    use dr_03_contract_codec::{RegisterCall, RegistryCall};
    use dr_04_chain_client::{ChainClient, HttpChainClient};
    use dr_05_document_registry::{
        ContentCheck, DocumentRegistryApi, DocumentRegistryService, RegisterRequest,
        RegisterV2Request, RegistryConfig, RegistryError, ReissueRequest, TransactionStatus,
        VerifyOutcome,
    };
    use shared_types::{encode_hex, hash_content, hash_file, parse_tx_hash, U256};
    use std::collections::BTreeMap;
    use std::io::Write;
    use std::time::Duration;

    const ISSUER_KEY: &str = "0x4646464646464646464646464646464646464646464646464646464646464646";
    const OTHER_KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn config(node: &SimulatedNode, key: &str) -> RegistryConfig {
        let mut config = RegistryConfig::default();
        config.network.rpc_url = node.url.clone();
        config.network.chain_id = CHAIN_ID;
        config.wallet.private_key = Some(key.to_string());
        config.contract.address = encode_hex(&REGISTRY);
        config
    }

    fn service_with(
        node: &SimulatedNode,
        config: RegistryConfig,
        timeout: Duration,
    ) -> DocumentRegistryService<HttpChainClient> {
        let client = HttpChainClient::with_timeout(node.url.clone(), timeout).unwrap();
        DocumentRegistryService::new(config, client).unwrap()
    }

    fn service(node: &SimulatedNode, key: &str) -> DocumentRegistryService<HttpChainClient> {
        service_with(node, config(node, key), Duration::from_secs(5))
    }

    fn doc_id(byte: u8) -> String {
        encode_hex(&[byte; 32])
    }

    fn request(byte: u8, content: &[u8]) -> RegisterRequest {
        RegisterRequest {
            document_id: doc_id(byte),
            document_hash: encode_hex(&hash_content(content)),
            document_type: "diploma".to_string(),
            expiry_date: None,
            metadata: BTreeMap::from([("course".to_string(), "Physics".to_string())]),
        }
    }

    async fn status(
        service: &DocumentRegistryService<HttpChainClient>,
        tx_hash: [u8; 32],
    ) -> TransactionStatus {
        service.check_status(&encode_hex(&tx_hash)).await.unwrap()
    }

    // =============================================================================
    // HAPPY PATHS
    // =============================================================================

    /// Test: a registered document can be read back and matched against its file
    #[tokio::test]
    async fn test_register_then_verify_round_trip() {
        let node = SimulatedNode::start().await;
        let service = service(&node, ISSUER_KEY);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.7 diploma of Jane Doe").unwrap();
        let document_hash = hash_file(file.path()).unwrap();

        let submitted = service
            .register(RegisterRequest {
                document_hash: encode_hex(&document_hash),
                ..request(0x01, b"")
            })
            .await
            .unwrap();
        assert_eq!(submitted.nonce, 0);
        assert_eq!(submitted.contract, REGISTRY);
        assert_eq!(
            status(&service, submitted.tx_hash).await,
            TransactionStatus::Confirmed { block_number: 1 }
        );

        let record = service.verify(&doc_id(0x01)).await.unwrap().found().unwrap();
        assert_eq!(record.document_id, [0x01; 32]);
        assert_eq!(record.issuer, service.sender());
        assert_eq!(record.document_hash, document_hash);
        assert_eq!(record.document_type, "diploma");
        assert_eq!(record.expiry_date, 0);
        assert!(!record.revoked);
        assert_eq!(record.previous_version, None);
        assert!(service.is_valid(&doc_id(0x01)).await.unwrap());

        assert_eq!(
            service
                .verify_content(&doc_id(0x01), b"%PDF-1.7 diploma of Jane Doe")
                .await
                .unwrap(),
            ContentCheck::Match
        );
        assert!(matches!(
            service
                .verify_content(&doc_id(0x01), b"%PDF-1.7 diploma of John Doe")
                .await
                .unwrap(),
            ContentCheck::Mismatch { .. }
        ));
    }

    /// Test: the broadcast transaction decodes back to the registry address
    /// and the exact four call arguments
    #[tokio::test]
    async fn test_register_transaction_carries_call_arguments() {
        let node = SimulatedNode::start().await;
        let service = service(&node, ISSUER_KEY);
        let document_id = hash_content(b"certificate-2024-0001");
        let document_hash = hash_content(b"hello world");

        service
            .register(RegisterRequest {
                document_id: encode_hex(&document_id),
                document_hash: encode_hex(&document_hash),
                document_type: "certificate".to_string(),
                expiry_date: Some(0),
                metadata: BTreeMap::new(),
            })
            .await
            .unwrap();

        let accepted = node.with(|l| l.accepted[0].clone());
        assert_eq!(accepted.tx().to, Some(REGISTRY));
        assert_eq!(accepted.tx().value, U256::zero());
        assert_eq!(
            RegistryCall::decode(&accepted.tx().data).unwrap(),
            RegistryCall::Register(RegisterCall {
                document_id,
                document_hash,
                document_type: "certificate".to_string(),
                expiry_date: 0,
            })
        );
    }

    #[tokio::test]
    async fn test_broadcast_uses_node_gas_price_and_configured_limit() {
        let node = SimulatedNode::start().await;
        let service = service(&node, ISSUER_KEY);

        let submitted = service.register(request(0x02, b"x")).await.unwrap();

        let accepted = node.with(|l| l.accepted.clone());
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].tx_hash(), submitted.tx_hash);
        assert_eq!(accepted[0].tx().gas_price, U256::from(1_500_000_000u64));
        assert_eq!(accepted[0].tx().gas_limit, U256::from(300_000u64));
        assert_eq!(accepted[0].chain_id(), CHAIN_ID);
        assert_eq!(
            accepted[0].recover_sender().unwrap(),
            KeyMaterial::from_hex(ISSUER_KEY).unwrap().address()
        );
    }

    #[tokio::test]
    async fn test_revoke_invalidates_document() {
        let node = SimulatedNode::start().await;
        let service = service(&node, ISSUER_KEY);

        service.register(request(0x03, b"x")).await.unwrap();
        let revoked = service.revoke(&doc_id(0x03), "issued in error").await.unwrap();
        assert_eq!(revoked.nonce, 1);
        assert!(matches!(
            status(&service, revoked.tx_hash).await,
            TransactionStatus::Confirmed { .. }
        ));

        assert!(!service.is_valid(&doc_id(0x03)).await.unwrap());
        let record = service.verify(&doc_id(0x03)).await.unwrap().found().unwrap();
        assert!(record.revoked);
    }

    #[tokio::test]
    async fn test_reissue_links_previous_version() {
        let node = SimulatedNode::start().await;
        let service = service(&node, ISSUER_KEY);

        service.register(request(0x04, b"v1")).await.unwrap();
        let submitted = service
            .reissue(ReissueRequest {
                old_document_id: doc_id(0x04),
                new_document_id: doc_id(0x05),
                new_document_hash: encode_hex(&hash_content(b"v2")),
                document_type: "diploma".to_string(),
                expiry_date: Some(4_102_444_800),
            })
            .await
            .unwrap();
        assert!(matches!(
            status(&service, submitted.tx_hash).await,
            TransactionStatus::Confirmed { .. }
        ));

        let new = service.verify(&doc_id(0x05)).await.unwrap().found().unwrap();
        assert_eq!(new.previous_version, Some([0x04; 32]));
        assert_eq!(new.expiry_date, 4_102_444_800);
        assert!(service.is_valid(&doc_id(0x05)).await.unwrap());
        assert!(!service.is_valid(&doc_id(0x04)).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_document_is_not_valid() {
        let node = SimulatedNode::start().await;
        let service = service(&node, ISSUER_KEY);

        let mut expired = request(0x06, b"x");
        expired.expiry_date = Some(1_000_000_000);
        service.register(expired).await.unwrap();

        assert!(service.verify(&doc_id(0x06)).await.unwrap().is_found());
        assert!(!service.is_valid(&doc_id(0x06)).await.unwrap());
    }

    #[tokio::test]
    async fn test_transaction_pending_until_mined() {
        let node = SimulatedNode::start().await;
        node.with(|l| l.auto_mine = false);
        let service = service(&node, ISSUER_KEY);

        let first = service.register(request(0x07, b"a")).await.unwrap();
        let second = service.register(request(0x08, b"b")).await.unwrap();
        assert_eq!((first.nonce, second.nonce), (0, 1));
        assert_eq!(status(&service, first.tx_hash).await, TransactionStatus::Pending);

        node.with(|l| l.mine());
        assert_eq!(
            status(&service, first.tx_hash).await,
            TransactionStatus::Confirmed { block_number: 1 }
        );
        assert_eq!(
            status(&service, second.tx_hash).await,
            TransactionStatus::Confirmed { block_number: 1 }
        );
    }

    #[tokio::test]
    async fn test_v2_register_and_metadata() {
        let node = SimulatedNode::start().await;
        let mut config = config(&node, ISSUER_KEY);
        config.contract.v2_address = Some(encode_hex(&REGISTRY_V2));
        let service = service_with(&node, config, Duration::from_secs(5));

        let submitted = service
            .register_v2(RegisterV2Request {
                document_id: doc_id(0x09),
                document_type: "license".to_string(),
                document_number: "LIC-0042".to_string(),
                document_title: "Professional License".to_string(),
                issued_date: 1_700_000_000,
                effective_from: 1_700_000_000,
                effective_until: Some(1_900_000_000),
                expiry_date: Some(1_900_000_000),
                issuer_name: "Licensing Board".to_string(),
                issuer_country: "NL".to_string(),
                holder_full_name: "A. Jansen".to_string(),
                holder_nationality: "NL".to_string(),
                ipfs_hash: Some("bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi".to_string()),
                pdf_hash: encode_hex(&hash_content(b"license.pdf")),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(submitted.contract, REGISTRY_V2);
        assert_eq!(
            node.with(|l| l.accepted[0].tx().gas_limit),
            U256::from(500_000u64)
        );

        let record = service
            .document_metadata(&doc_id(0x09))
            .await
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(record.document_number, "LIC-0042");
        assert_eq!(record.effective_until, 1_900_000_000);
        assert_eq!(record.issuer, service.sender());
        assert_eq!(record.pdf_hash, hash_content(b"license.pdf"));
        assert!(record.ipfs_hash.is_some());

        assert_eq!(
            service.document_metadata(&doc_id(0x0a)).await.unwrap(),
            VerifyOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_abi_artifact_from_disk() {
        let node = SimulatedNode::start().await;
        let function = |name: &str, inputs: &[&str]| {
            let inputs: Vec<_> = inputs
                .iter()
                .map(|t| serde_json::json!({ "name": "", "type": t }))
                .collect();
            serde_json::json!({ "type": "function", "name": name, "inputs": inputs })
        };
        let artifact = serde_json::json!({
            "contractName": "DocumentRegistry",
            "abi": [
                function("registerDocument", &["bytes32", "bytes32", "string", "uint256"]),
                function("revokeDocument", &["bytes32"]),
                function("getDocument", &["bytes32"]),
                function("isDocumentValid", &["bytes32"]),
                function("reissueDocument", &["bytes32", "bytes32", "bytes32", "string", "uint256"]),
                { "type": "event", "name": "DocumentRegistered", "inputs": [] },
            ]
        });
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(artifact.to_string().as_bytes()).unwrap();

        let mut config = config(&node, ISSUER_KEY);
        config.contract.abi_path = Some(file.path().to_path_buf());
        let service = service_with(&node, config, Duration::from_secs(5));

        service.register(request(0x0b, b"x")).await.unwrap();
        assert!(node.document([0x0b; 32]).is_some());
    }

    #[tokio::test]
    async fn test_node_reports_configured_chain() {
        let node = SimulatedNode::start().await;
        let service = service(&node, ISSUER_KEY);
        assert_eq!(service.context().client.chain_id().await.unwrap(), CHAIN_ID);
    }

    // =============================================================================
    // FAILURE MODES
    // =============================================================================

    #[tokio::test]
    async fn test_unknown_document_is_not_found() {
        let node = SimulatedNode::start().await;
        let service = service(&node, ISSUER_KEY);

        assert_eq!(
            service.verify(&doc_id(0xee)).await.unwrap(),
            VerifyOutcome::NotFound
        );
        assert!(!service.is_valid(&doc_id(0xee)).await.unwrap());
        assert_eq!(
            service.verify_content(&doc_id(0xee), b"x").await.unwrap(),
            ContentCheck::NotFound
        );
    }

    /// Test: contract-level failures are mined, so they surface as a failed
    /// status rather than a send error
    #[tokio::test]
    async fn test_reverted_transactions_are_mined_as_failed() {
        let node = SimulatedNode::start().await;
        node.with(|l| l.reject_reverts = false);
        let issuer = service(&node, ISSUER_KEY);
        let other = service(&node, OTHER_KEY);

        issuer.register(request(0x10, b"x")).await.unwrap();

        let duplicate = issuer.register(request(0x10, b"y")).await.unwrap();
        assert!(matches!(
            status(&issuer, duplicate.tx_hash).await,
            TransactionStatus::Failed { .. }
        ));

        let hijack = other.revoke(&doc_id(0x10), "not mine").await.unwrap();
        assert_eq!(hijack.nonce, 0);
        assert!(matches!(
            status(&other, hijack.tx_hash).await,
            TransactionStatus::Failed { .. }
        ));

        let record = issuer.verify(&doc_id(0x10)).await.unwrap().found().unwrap();
        assert_eq!(record.document_hash, hash_content(b"x"));
        assert!(!record.revoked);
    }

    /// Test: a node that simulates before accepting reports the contract's
    /// revert reason, and the nonce stays free
    #[tokio::test]
    async fn test_revoke_unknown_document_is_rejected_with_reason() {
        let node = SimulatedNode::start().await;
        let service = service(&node, ISSUER_KEY);

        let err = service
            .revoke(&encode_hex(&[0u8; 32]), "cleanup")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::BroadcastRejected {
                code: 3,
                message: "execution reverted: Document does not exist".to_string(),
            }
        );

        let next = service.register(request(0x15, b"x")).await.unwrap();
        assert_eq!(next.nonce, 0);
    }

    #[tokio::test]
    async fn test_rejected_broadcast_keeps_nonce() {
        let node = SimulatedNode::start().await;
        let service = service(&node, ISSUER_KEY);
        node.with(|l| l.fault = Some(SendFault::Unfunded));

        let err = service.register(request(0x11, b"x")).await.unwrap_err();
        match &err {
            RegistryError::BroadcastRejected { code, message } => {
                assert_eq!(*code, -32000);
                assert!(message.contains("insufficient funds"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_retryable());

        let retried = service.register(request(0x11, b"x")).await.unwrap();
        assert_eq!(retried.nonce, 0);
        assert!(node.document([0x11; 32]).is_some());
    }

    /// Test: a send that times out reports the local hash, which the node
    /// later confirms
    #[tokio::test]
    async fn test_hung_broadcast_reports_unknown_outcome() {
        let node = SimulatedNode::start().await;
        let service = service_with(&node, config(&node, ISSUER_KEY), Duration::from_secs(1));
        node.with(|l| l.fault = Some(SendFault::Hang));

        let err = service.register(request(0x12, b"x")).await.unwrap_err();
        let tx_hash = match err {
            RegistryError::BroadcastUnknown { tx_hash } => tx_hash,
            other => panic!("unexpected error: {other:?}"),
        };
        assert_eq!(
            parse_tx_hash(&tx_hash).unwrap(),
            node.with(|l| l.accepted[0].tx_hash())
        );
        assert!(matches!(
            service.check_status(&tx_hash).await.unwrap(),
            TransactionStatus::Confirmed { .. }
        ));

        let next = service.register(request(0x13, b"y")).await.unwrap();
        assert_eq!(next.nonce, 1);
        assert!(node.document([0x13; 32]).is_some());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_retryable_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut config = RegistryConfig::default();
        config.network.rpc_url = format!("http://127.0.0.1:{port}");
        config.wallet.private_key = Some(ISSUER_KEY.to_string());
        config.contract.address = encode_hex(&REGISTRY);
        let client = HttpChainClient::new(config.network.rpc_url.clone()).unwrap();
        let service = DocumentRegistryService::new(config, client).unwrap();

        let err = service.verify(&doc_id(1)).await.unwrap_err();
        assert!(matches!(err, RegistryError::Network(_)));
        assert!(err.is_retryable());

        let err = service.register(request(1, b"x")).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_node() {
        let node = SimulatedNode::start().await;
        let service = service(&node, ISSUER_KEY);

        let mut bad = request(0x14, b"x");
        bad.document_id = "0x1234".to_string();
        assert!(matches!(
            service.register(bad).await,
            Err(RegistryError::InvalidFormat(_))
        ));
        assert!(matches!(
            service.verify("not-an-id").await,
            Err(RegistryError::InvalidFormat(_))
        ));
        assert_eq!(node.with(|l| l.methods.len()), 0);
    }
}
