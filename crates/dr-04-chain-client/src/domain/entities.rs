//! # Chain Entities

use shared_types::{Hash, U256};

/// Block parameter for state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    /// Includes transactions still in the node's pool.
    Pending,
}

impl BlockTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockTag::Latest => "latest",
            BlockTag::Pending => "pending",
        }
    }
}

/// The fields of `eth_getTransactionReceipt` the registry reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: Hash,
    /// `None` while some nodes report a receipt for a pending block.
    pub block_number: Option<u64>,
    /// `Some(1)` on success, `Some(0)` on revert; absent before Byzantium.
    pub status: Option<u64>,
    pub gas_used: Option<U256>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == Some(1)
    }
}
