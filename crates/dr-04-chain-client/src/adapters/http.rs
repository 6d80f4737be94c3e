//! # HTTP JSON-RPC Adapter
//!
//! [`ChainClient`] over HTTP POST with reqwest. Request ids increase
//! monotonically per client.

use super::jsonrpc::{JsonRpcRequest, JsonRpcResponse, RawReceipt};
use crate::domain::entities::{BlockTag, TransactionReceipt};
use crate::domain::errors::ChainError;
use crate::ports::outbound::ChainClient;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use shared_types::{
    decode_hex, encode_hex, parse_quantity, parse_quantity_u64, parse_tx_hash, Address, Hash,
    U256,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Client-side timeout for every request unless configured otherwise.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC client for an Ethereum node.
pub struct HttpChainClient {
    http_client: reqwest::Client,
    rpc_url: String,
    request_id: AtomicU64,
}

impl HttpChainClient {
    /// Create a client with the default 30 s timeout.
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, ChainError> {
        Self::with_timeout(rpc_url, DEFAULT_RPC_TIMEOUT)
    }

    pub fn with_timeout(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self, ChainError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            rpc_url: rpc_url.into(),
            request_id: AtomicU64::new(1),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    fn map_send_error(&self, method: &str, e: reqwest::Error) -> ChainError {
        if e.is_timeout() {
            ChainError::Timeout(format!("{method} to {}", self.rpc_url))
        } else if e.is_connect() {
            ChainError::Connection(self.rpc_url.clone())
        } else {
            ChainError::Transport(e.to_string())
        }
    }

    /// Make a JSON-RPC call and return the raw `result` (`Null` if absent).
    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ChainError> {
        let id = self.next_id();
        debug!(method, id, "JSON-RPC request");

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&JsonRpcRequest::new(method, params, id))
            .send()
            .await
            .map_err(|e| self.map_send_error(method, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(method, e))?;

        let rpc_response: JsonRpcResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(ChainError::Transport(format!("HTTP {status} from {method}")));
            }
            Err(e) => return Err(ChainError::InvalidResponse(format!("{method}: {e}"))),
        };

        if let Some(error) = rpc_response.error {
            warn!(method, code = error.code, message = %error.message, "JSON-RPC error");
            return Err(ChainError::Rpc {
                code: error.code,
                data: error.data_string(),
                message: error.message,
            });
        }

        Ok(rpc_response.result.unwrap_or(serde_json::Value::Null))
    }

    async fn call_typed<R: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<R, ChainError> {
        let result = self.request(method, params).await?;
        serde_json::from_value(result)
            .map_err(|e| ChainError::InvalidResponse(format!("{method}: {e}")))
    }
}

fn invalid(method: &str) -> impl Fn(shared_types::FormatError) -> ChainError + '_ {
    move |e| ChainError::InvalidResponse(format!("{method}: {e}"))
}

fn parse_receipt(raw: RawReceipt) -> Result<TransactionReceipt, ChainError> {
    let method = "eth_getTransactionReceipt";
    Ok(TransactionReceipt {
        transaction_hash: parse_tx_hash(&raw.transaction_hash).map_err(invalid(method))?,
        block_number: raw
            .block_number
            .as_deref()
            .map(parse_quantity_u64)
            .transpose()
            .map_err(invalid(method))?,
        status: raw
            .status
            .as_deref()
            .map(parse_quantity_u64)
            .transpose()
            .map_err(invalid(method))?,
        gas_used: raw
            .gas_used
            .as_deref()
            .map(parse_quantity)
            .transpose()
            .map_err(invalid(method))?,
    })
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn get_transaction_count(
        &self,
        address: Address,
        block: BlockTag,
    ) -> Result<u64, ChainError> {
        let method = "eth_getTransactionCount";
        let count: String = self
            .call_typed(method, json!([encode_hex(&address), block.as_str()]))
            .await?;
        parse_quantity_u64(&count).map_err(invalid(method))
    }

    async fn gas_price(&self) -> Result<U256, ChainError> {
        let method = "eth_gasPrice";
        let price: String = self.call_typed(method, json!([])).await?;
        parse_quantity(&price).map_err(invalid(method))
    }

    async fn send_raw_transaction(&self, raw_hex: &str) -> Result<Hash, ChainError> {
        let method = "eth_sendRawTransaction";
        let hash: String = self.call_typed(method, json!([raw_hex])).await?;
        parse_tx_hash(&hash).map_err(invalid(method))
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: Hash,
    ) -> Result<Option<TransactionReceipt>, ChainError> {
        let raw: Option<RawReceipt> = self
            .call_typed("eth_getTransactionReceipt", json!([encode_hex(&tx_hash)]))
            .await?;
        raw.map(parse_receipt).transpose()
    }

    async fn call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        let method = "eth_call";
        let params = json!([
            { "to": encode_hex(&to), "data": encode_hex(data) },
            BlockTag::Latest.as_str(),
        ]);
        let result: String = self.call_typed(method, params).await?;
        decode_hex(&result).map_err(invalid(method))
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        let method = "eth_chainId";
        let id: String = self.call_typed(method, json!([])).await?;
        parse_quantity_u64(&id).map_err(invalid(method))
    }
}
