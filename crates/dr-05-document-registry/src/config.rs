//! # Registry Configuration
//!
//! Network, wallet, contract and gas settings. Values come from the
//! environment (`from_env`) or a JSON document; unset fields fall back to
//! the defaults below.
//!
//! ## Security Requirements
//!
//! - The private key is wiped when the config is dropped and is never
//!   printed by `Debug`

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Sepolia.
pub const DEFAULT_CHAIN_ID: u64 = 11_155_111;
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;
/// V2 registrations carry far more calldata.
pub const DEFAULT_GAS_LIMIT_V2: u64 = 500_000;
pub const DEFAULT_GAS_PRICE_GWEI: u64 = 20;
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub network: NetworkConfig,
    pub wallet: WalletConfig,
    pub contract: ContractConfig,
    pub gas: GasConfig,
}

/// Node connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub rpc_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: String::new(),
            chain_id: DEFAULT_CHAIN_ID,
            rpc_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
        }
    }
}

/// Sender identity. Without a private key the service is read-only.
#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct WalletConfig {
    /// Expected sender; checked against the key when both are set.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub private_key: Option<String>,
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("address", &self.address)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Registry contract deployments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub address: String,
    /// Compiled ABI; the built-in function table is used when absent.
    pub abi_path: Option<PathBuf>,
    pub v2_address: Option<String>,
    pub v2_abi_path: Option<PathBuf>,
}

/// Gas limits and the price used when `eth_gasPrice` fails.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    pub gas_limit: u64,
    pub gas_limit_v2: u64,
    pub gas_price_gwei: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_limit_v2: DEFAULT_GAS_LIMIT_V2,
            gas_price_gwei: DEFAULT_GAS_PRICE_GWEI,
        }
    }
}

impl RegistryConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = RegistryConfig::default();

        if let Some(url) = get("BLOCKCHAIN_RPC_URL") {
            config.network.rpc_url = url;
        }
        if let Some(v) = get("BLOCKCHAIN_CHAIN_ID") {
            config.network.chain_id = parse_u64("BLOCKCHAIN_CHAIN_ID", &v)?;
        }
        if let Some(v) = get("BLOCKCHAIN_RPC_TIMEOUT_SECS") {
            config.network.rpc_timeout_secs = parse_u64("BLOCKCHAIN_RPC_TIMEOUT_SECS", &v)?;
        }

        config.wallet.address = get("BLOCKCHAIN_WALLET_ADDRESS");
        config.wallet.private_key = get("BLOCKCHAIN_WALLET_PRIVATE_KEY");

        if let Some(address) = get("DOCUMENT_REGISTRY_CONTRACT_ADDRESS") {
            config.contract.address = address;
        }
        config.contract.abi_path = get("DOCUMENT_REGISTRY_ABI_PATH").map(PathBuf::from);
        config.contract.v2_address = get("DOCUMENT_REGISTRY_V2_CONTRACT_ADDRESS");
        config.contract.v2_abi_path = get("DOCUMENT_REGISTRY_V2_ABI_PATH").map(PathBuf::from);

        if let Some(v) = get("BLOCKCHAIN_GAS_LIMIT") {
            config.gas.gas_limit = parse_u64("BLOCKCHAIN_GAS_LIMIT", &v)?;
        }
        if let Some(v) = get("BLOCKCHAIN_GAS_LIMIT_V2") {
            config.gas.gas_limit_v2 = parse_u64("BLOCKCHAIN_GAS_LIMIT_V2", &v)?;
        }
        if let Some(v) = get("BLOCKCHAIN_GAS_PRICE_GWEI") {
            config.gas.gas_price_gwei = parse_u64("BLOCKCHAIN_GAS_PRICE_GWEI", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check required settings and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.rpc_url.trim().is_empty() {
            return Err(ConfigError::Missing("BLOCKCHAIN_RPC_URL"));
        }
        if !self.network.rpc_url.starts_with("http://") && !self.network.rpc_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid {
                key: "BLOCKCHAIN_RPC_URL",
                message: "must be an http(s) URL".to_string(),
            });
        }
        if self.network.chain_id == 0 {
            return Err(ConfigError::Invalid {
                key: "BLOCKCHAIN_CHAIN_ID",
                message: "must be positive".to_string(),
            });
        }
        if self.network.rpc_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "BLOCKCHAIN_RPC_TIMEOUT_SECS",
                message: "must be positive".to_string(),
            });
        }
        if self.contract.address.trim().is_empty() {
            return Err(ConfigError::Missing("DOCUMENT_REGISTRY_CONTRACT_ADDRESS"));
        }
        if self.wallet.address.is_none() && self.wallet.private_key.is_none() {
            return Err(ConfigError::Missing("BLOCKCHAIN_WALLET_PRIVATE_KEY"));
        }
        if self.gas.gas_limit == 0 || self.gas.gas_limit_v2 == 0 {
            return Err(ConfigError::Invalid {
                key: "BLOCKCHAIN_GAS_LIMIT",
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_u64(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        message: format!("expected an unsigned integer, got {value:?}"),
    })
}
