//! # Registry Calls
//!
//! One struct per contract function. [`RegistryCall`] tags them so the
//! service can hand any of them to the same build/sign path, and so a
//! signed payload can be decoded back into arguments.

use super::abi::{encode_call, AbiReader, FunctionSpec, Token};
use super::errors::AbiError;
use shared_types::{Hash, U256};

use super::abi::ParamKind::{Bool as B, Bytes32 as B32, String as S, Uint256 as U};

// =============================================================================
// FUNCTION TABLE
// =============================================================================

pub const REGISTER_DOCUMENT: FunctionSpec = FunctionSpec {
    name: "registerDocument",
    inputs: &[B32, B32, S, U],
};

pub const REVOKE_DOCUMENT: FunctionSpec = FunctionSpec {
    name: "revokeDocument",
    inputs: &[B32],
};

pub const GET_DOCUMENT: FunctionSpec = FunctionSpec {
    name: "getDocument",
    inputs: &[B32],
};

pub const IS_DOCUMENT_VALID: FunctionSpec = FunctionSpec {
    name: "isDocumentValid",
    inputs: &[B32],
};

pub const REISSUE_DOCUMENT: FunctionSpec = FunctionSpec {
    name: "reissueDocument",
    inputs: &[B32, B32, B32, S, U],
};

pub const REGISTER_DOCUMENT_V2: FunctionSpec = FunctionSpec {
    name: "registerDocument",
    inputs: &[B32, S, S, S, U, U, U, U, B, S, S, S, S, S, S, S, B32],
};

/// Functions the service calls on the V1 registry.
pub const V1_FUNCTIONS: &[FunctionSpec] = &[
    REGISTER_DOCUMENT,
    REVOKE_DOCUMENT,
    GET_DOCUMENT,
    IS_DOCUMENT_VALID,
    REISSUE_DOCUMENT,
];

/// Functions the service calls on the V2 registry.
pub const V2_FUNCTIONS: &[FunctionSpec] = &[REGISTER_DOCUMENT_V2, GET_DOCUMENT];

// =============================================================================
// CALL STRUCTS
// =============================================================================

/// `registerDocument(bytes32 id, bytes32 hash, string type, uint256 expiry)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterCall {
    pub document_id: Hash,
    pub document_hash: Hash,
    pub document_type: String,
    /// Unix seconds, 0 = never expires.
    pub expiry_date: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeCall {
    pub document_id: Hash,
}

/// Shared by the V1 and V2 contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDocumentCall {
    pub document_id: Hash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsDocumentValidCall {
    pub document_id: Hash,
}

/// Revokes `old_document_id` and registers a successor pointing back at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReissueCall {
    pub old_document_id: Hash,
    pub new_document_id: Hash,
    pub new_document_hash: Hash,
    pub document_type: String,
    pub expiry_date: u64,
}

/// The V2 registration with issuer, holder and validity metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterV2Call {
    pub document_id: Hash,
    pub document_type: String,
    pub document_number: String,
    pub document_title: String,
    pub issued_date: u64,
    pub effective_from: u64,
    /// 0 = open-ended.
    pub effective_until: u64,
    pub expiry_date: u64,
    pub is_permanent: bool,
    pub issuer_name: String,
    pub issuer_country: String,
    pub issuer_registration_number: String,
    pub holder_full_name: String,
    pub holder_id_number: String,
    pub holder_nationality: String,
    /// Empty when the file is not pinned to IPFS.
    pub ipfs_hash: String,
    pub pdf_hash: Hash,
}

// =============================================================================
// REGISTRY CALL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    Register(RegisterCall),
    Revoke(RevokeCall),
    GetDocument(GetDocumentCall),
    IsDocumentValid(IsDocumentValidCall),
    Reissue(ReissueCall),
    RegisterV2(RegisterV2Call),
    GetDocumentV2(GetDocumentCall),
}

fn uint(value: u64) -> Token {
    Token::Uint(U256::from(value))
}

fn string(value: &str) -> Token {
    Token::String(value.to_string())
}

impl RegistryCall {
    pub fn function(&self) -> FunctionSpec {
        match self {
            RegistryCall::Register(_) => REGISTER_DOCUMENT,
            RegistryCall::Revoke(_) => REVOKE_DOCUMENT,
            RegistryCall::GetDocument(_) | RegistryCall::GetDocumentV2(_) => GET_DOCUMENT,
            RegistryCall::IsDocumentValid(_) => IS_DOCUMENT_VALID,
            RegistryCall::Reissue(_) => REISSUE_DOCUMENT,
            RegistryCall::RegisterV2(_) => REGISTER_DOCUMENT_V2,
        }
    }

    /// Whether the call changes contract state (needs a signed transaction).
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            RegistryCall::Register(_)
                | RegistryCall::Revoke(_)
                | RegistryCall::Reissue(_)
                | RegistryCall::RegisterV2(_)
        )
    }

    fn tokens(&self) -> Vec<Token> {
        match self {
            RegistryCall::Register(call) => vec![
                Token::FixedBytes(call.document_id),
                Token::FixedBytes(call.document_hash),
                string(&call.document_type),
                uint(call.expiry_date),
            ],
            RegistryCall::Revoke(RevokeCall { document_id })
            | RegistryCall::GetDocument(GetDocumentCall { document_id })
            | RegistryCall::GetDocumentV2(GetDocumentCall { document_id })
            | RegistryCall::IsDocumentValid(IsDocumentValidCall { document_id }) => {
                vec![Token::FixedBytes(*document_id)]
            }
            RegistryCall::Reissue(call) => vec![
                Token::FixedBytes(call.old_document_id),
                Token::FixedBytes(call.new_document_id),
                Token::FixedBytes(call.new_document_hash),
                string(&call.document_type),
                uint(call.expiry_date),
            ],
            RegistryCall::RegisterV2(call) => vec![
                Token::FixedBytes(call.document_id),
                string(&call.document_type),
                string(&call.document_number),
                string(&call.document_title),
                uint(call.issued_date),
                uint(call.effective_from),
                uint(call.effective_until),
                uint(call.expiry_date),
                Token::Bool(call.is_permanent),
                string(&call.issuer_name),
                string(&call.issuer_country),
                string(&call.issuer_registration_number),
                string(&call.holder_full_name),
                string(&call.holder_id_number),
                string(&call.holder_nationality),
                string(&call.ipfs_hash),
                Token::FixedBytes(call.pdf_hash),
            ],
        }
    }

    /// Calldata: selector followed by the encoded arguments.
    pub fn encode(&self) -> Vec<u8> {
        encode_call(self.function().selector(), &self.tokens())
    }

    /// Parse calldata back into a call.
    ///
    /// V1 and V2 `getDocument` share calldata; both decode as
    /// [`RegistryCall::GetDocument`].
    pub fn decode(data: &[u8]) -> Result<Self, AbiError> {
        if data.len() < 4 {
            return Err(AbiError::Truncated {
                needed: 4,
                available: data.len(),
            });
        }
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);
        let args = AbiReader::new(&data[4..]);

        if selector == REGISTER_DOCUMENT.selector() {
            Ok(RegistryCall::Register(RegisterCall {
                document_id: args.bytes32(0)?,
                document_hash: args.bytes32(1)?,
                document_type: args.string(2)?,
                expiry_date: args.u64(3)?,
            }))
        } else if selector == REVOKE_DOCUMENT.selector() {
            Ok(RegistryCall::Revoke(RevokeCall {
                document_id: args.bytes32(0)?,
            }))
        } else if selector == GET_DOCUMENT.selector() {
            Ok(RegistryCall::GetDocument(GetDocumentCall {
                document_id: args.bytes32(0)?,
            }))
        } else if selector == IS_DOCUMENT_VALID.selector() {
            Ok(RegistryCall::IsDocumentValid(IsDocumentValidCall {
                document_id: args.bytes32(0)?,
            }))
        } else if selector == REISSUE_DOCUMENT.selector() {
            Ok(RegistryCall::Reissue(ReissueCall {
                old_document_id: args.bytes32(0)?,
                new_document_id: args.bytes32(1)?,
                new_document_hash: args.bytes32(2)?,
                document_type: args.string(3)?,
                expiry_date: args.u64(4)?,
            }))
        } else if selector == REGISTER_DOCUMENT_V2.selector() {
            Ok(RegistryCall::RegisterV2(RegisterV2Call {
                document_id: args.bytes32(0)?,
                document_type: args.string(1)?,
                document_number: args.string(2)?,
                document_title: args.string(3)?,
                issued_date: args.u64(4)?,
                effective_from: args.u64(5)?,
                effective_until: args.u64(6)?,
                expiry_date: args.u64(7)?,
                is_permanent: args.bool(8)?,
                issuer_name: args.string(9)?,
                issuer_country: args.string(10)?,
                issuer_registration_number: args.string(11)?,
                holder_full_name: args.string(12)?,
                holder_id_number: args.string(13)?,
                holder_nationality: args.string(14)?,
                ipfs_hash: args.string(15)?,
                pdf_hash: args.bytes32(16)?,
            }))
        } else {
            Err(AbiError::UnknownSelector(selector))
        }
    }
}
