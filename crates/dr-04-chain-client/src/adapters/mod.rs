//! # Adapters Layer

pub mod http;
mod jsonrpc;
