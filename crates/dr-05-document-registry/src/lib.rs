//! # Document Registry Service (DR-05)
//!
//! Anchors document hashes in a registry contract and reads them back.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): requests, outcomes, the error taxonomy,
//!   and the nonce tracker
//! - **Ports Layer** (`ports/`): [`DocumentRegistryApi`], the inbound API
//! - **Service Layer** (`service.rs`): wires the codec, the signer and a
//!   [`ChainClient`](dr_04_chain_client::ChainClient) together
//!
//! ## Write Path
//!
//! ```text
//! validate ids ─▶ encode call ─▶ [lock] nonce ─▶ sign ─▶ broadcast [unlock] ─▶ tx hash
//! ```
//!
//! Writes never wait for mining. Callers keep the returned hash and poll
//! [`DocumentRegistryApi::check_status`].

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::{ConfigError, ContractConfig, GasConfig, NetworkConfig, RegistryConfig, WalletConfig};
pub use domain::entities::{
    ContentCheck, RegisterRequest, RegisterV2Request, ReissueRequest, SubmittedTransaction,
    TransactionStatus, VerifyOutcome,
};
pub use domain::errors::RegistryError;
pub use domain::nonce::NonceTracker;
pub use ports::inbound::DocumentRegistryApi;
pub use service::{DocumentRegistryService, RegistryContext};
