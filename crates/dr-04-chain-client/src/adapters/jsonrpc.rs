//! JSON-RPC 2.0 envelopes.

use serde::{Deserialize, Serialize};

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: serde_json::Value,
    pub id: u64,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(method: &'a str, params: serde_json::Value, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id,
        }
    }
}

/// JSON-RPC response structure. `result` stays untyped so that an explicit
/// `null` (e.g. no receipt yet) can be told apart per method.
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    /// `data` as a string: hex revert data is passed through, anything
    /// structured is re-serialized.
    pub fn data_string(&self) -> Option<String> {
        match &self.data {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Receipt fields as the node returns them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub gas_used: Option<String>,
}
