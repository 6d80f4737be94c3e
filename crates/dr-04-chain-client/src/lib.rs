//! # Chain Client (DR-04)
//!
//! The narrow slice of Ethereum JSON-RPC the registry needs.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): receipts, block tags, transport errors
//! - **Ports Layer** (`ports/`): the [`ChainClient`] trait the service depends on
//! - **Adapters Layer** (`adapters/`): [`HttpChainClient`], a reqwest
//!   implementation speaking JSON-RPC 2.0 over HTTP
//!
//! The adapter reports what happened on the wire and nothing more. Deciding
//! whether a timeout is retryable or a node error is a revert belongs to the
//! registry service.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::http::{HttpChainClient, DEFAULT_RPC_TIMEOUT};
pub use domain::entities::{BlockTag, TransactionReceipt};
pub use domain::errors::ChainError;
pub use ports::outbound::ChainClient;
