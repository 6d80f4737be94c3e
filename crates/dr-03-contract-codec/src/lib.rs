//! # Contract Call Codec (DR-03)
//!
//! Solidity ABI encoding for the fixed set of document registry functions,
//! and decoding of their return data.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): ABI words, the typed [`RegistryCall`]
//!   enum, record decoders, revert reasons
//! - **Adapters Layer** (`adapters/`): loading and checking the compiled
//!   contract ABI from disk
//!
//! There is no generic ABI engine: every supported function has its own
//! typed call struct, and each struct knows its canonical signature.

pub mod adapters;
pub mod domain;

pub use adapters::artifact::ContractAbi;
pub use domain::abi::{selector, AbiReader, FunctionSpec, ParamKind, Token};
pub use domain::calls::{
    GetDocumentCall, IsDocumentValidCall, ReissueCall, RegisterCall, RegisterV2Call,
    RegistryCall, RevokeCall, V1_FUNCTIONS, V2_FUNCTIONS,
};
pub use domain::errors::AbiError;
pub use domain::records::{
    decode_bool, decode_document, decode_document_v2, decode_revert_reason, DocumentRecord,
    DocumentRecordV2,
};
