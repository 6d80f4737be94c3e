//! # Concurrent Writers
//!
//! Many tasks share one service instance. The node enforces strict nonce
//! ordering, so any gap or reuse shows up as a rejected broadcast.

#[cfg(test)]
mod tests {
    use super::super::node::{SendFault, SimulatedNode, CHAIN_ID, REGISTRY};
    use dr_04_chain_client::HttpChainClient;
    use dr_05_document_registry::{
        DocumentRegistryApi, DocumentRegistryService, RegisterRequest, RegistryConfig,
        RegistryError,
    };
    use shared_types::{encode_hex, hash_content};
    use std::collections::BTreeSet;
    use std::sync::Arc;

    const KEY: &str = "0x4646464646464646464646464646464646464646464646464646464646464646";

    fn service(node: &SimulatedNode) -> Arc<DocumentRegistryService<HttpChainClient>> {
        let mut config = RegistryConfig::default();
        config.network.rpc_url = node.url.clone();
        config.network.chain_id = CHAIN_ID;
        config.wallet.private_key = Some(KEY.to_string());
        config.contract.address = encode_hex(&REGISTRY);
        let client = HttpChainClient::new(node.url.clone()).unwrap();
        Arc::new(DocumentRegistryService::new(config, client).unwrap())
    }

    fn request(i: u32) -> RegisterRequest {
        let mut id = [0u8; 32];
        id[28..].copy_from_slice(&i.to_be_bytes());
        RegisterRequest {
            document_id: encode_hex(&id),
            document_hash: encode_hex(&hash_content(&i.to_le_bytes())),
            document_type: "batch".to_string(),
            ..Default::default()
        }
    }

    /// Test: parallel registrations get consecutive, distinct nonces
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_registrations_use_consecutive_nonces() {
        let node = SimulatedNode::start().await;
        let service = service(&node);
        let writers = 16u32;

        let handles: Vec<_> = (0..writers)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.register(request(i)).await })
            })
            .collect();

        let mut nonces = BTreeSet::new();
        for handle in handles {
            let submitted = handle.await.unwrap().unwrap();
            assert!(nonces.insert(submitted.nonce), "nonce {} reused", submitted.nonce);
        }

        assert_eq!(nonces, (0..u64::from(writers)).collect());
        assert_eq!(
            node.with(|l| l.nonces.get(&service.sender()).copied()),
            Some(u64::from(writers))
        );
        assert_eq!(node.with(|l| l.documents.len()), writers as usize);
    }

    /// Test: a rejection in the middle of a burst leaves no gap
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_rejection_mid_burst_leaves_no_gap() {
        let node = SimulatedNode::start().await;
        let service = service(&node);

        service.register(request(100)).await.unwrap();
        node.with(|l| l.fault = Some(SendFault::Unfunded));

        let handles: Vec<_> = (0..6u32)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.register(request(i)).await })
            })
            .collect();

        let mut accepted = BTreeSet::new();
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(submitted) => {
                    accepted.insert(submitted.nonce);
                }
                Err(RegistryError::BroadcastRejected { .. }) => rejected += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(rejected, 1);
        assert_eq!(accepted, (1..6).collect());
        assert_eq!(node.with(|l| l.nonces.get(&service.sender()).copied()), Some(6));
    }
}
