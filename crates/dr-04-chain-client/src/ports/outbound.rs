//! # Outbound Ports (SPI)
//!
//! What the registry service needs from an Ethereum node.

use crate::domain::entities::{BlockTag, TransactionReceipt};
use crate::domain::errors::ChainError;
use async_trait::async_trait;
use shared_types::{Address, Hash, U256};

/// Ethereum JSON-RPC operations used by the registry.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// `eth_getTransactionCount`
    async fn get_transaction_count(
        &self,
        address: Address,
        block: BlockTag,
    ) -> Result<u64, ChainError>;

    /// `eth_gasPrice`, in wei.
    async fn gas_price(&self) -> Result<U256, ChainError>;

    /// `eth_sendRawTransaction`; returns the hash the node assigned.
    async fn send_raw_transaction(&self, raw_hex: &str) -> Result<Hash, ChainError>;

    /// `eth_getTransactionReceipt`; `None` while the transaction is not mined.
    async fn get_transaction_receipt(
        &self,
        tx_hash: Hash,
    ) -> Result<Option<TransactionReceipt>, ChainError>;

    /// `eth_call` against the latest block.
    async fn call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, ChainError>;

    /// `eth_chainId`
    async fn chain_id(&self) -> Result<u64, ChainError>;
}
