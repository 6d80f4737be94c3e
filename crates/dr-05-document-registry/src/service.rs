//! # Document Registry Service
//!
//! Application service implementing [`DocumentRegistryApi`].
//!
//! ## Architecture
//!
//! - Calls are built by `dr-03-contract-codec`
//! - Transactions are signed by `dr-02-transaction-signing`
//! - All node access goes through the [`ChainClient`] port
//!
//! ## Nonce Discipline
//!
//! One `tokio::sync::Mutex<NonceTracker>` is held from the nonce query
//! until the broadcast returns. Concurrent writers therefore get
//! consecutive nonces, and a rejected broadcast leaves its nonce free for
//! the next caller. Reads never take the lock.

use crate::config::RegistryConfig;
use crate::domain::entities::{
    ContentCheck, RegisterRequest, RegisterV2Request, ReissueRequest, SubmittedTransaction,
    TransactionStatus, VerifyOutcome,
};
use crate::domain::errors::RegistryError;
use crate::domain::nonce::NonceTracker;
use crate::ports::inbound::DocumentRegistryApi;
use async_trait::async_trait;
use dr_02_transaction_signing::{KeyMaterial, UnsignedTransaction};
use dr_03_contract_codec::{
    decode_bool, decode_document, decode_document_v2, decode_revert_reason, ContractAbi,
    DocumentRecord, DocumentRecordV2, FunctionSpec, GetDocumentCall, IsDocumentValidCall,
    RegisterCall, RegisterV2Call, RegistryCall, ReissueCall, RevokeCall, V1_FUNCTIONS,
    V2_FUNCTIONS,
};
use dr_04_chain_client::{BlockTag, ChainClient, ChainError};
use shared_types::{
    decode_hex, encode_hex, gwei_to_wei, hash_content, parse_address, parse_content_hash,
    parse_document_id, parse_tx_hash, verify_content_hash, Address, U256,
};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

// =============================================================================
// CONTEXT
// =============================================================================

/// Everything the service needs, resolved and validated once at startup.
pub struct RegistryContext<C: ChainClient> {
    pub config: RegistryConfig,
    /// `None` runs the service read-only.
    pub signer: Option<KeyMaterial>,
    pub sender: Address,
    pub client: C,
    pub contract: Address,
    pub abi: ContractAbi,
    pub contract_v2: Option<Address>,
    pub abi_v2: Option<ContractAbi>,
}

impl<C: ChainClient> RegistryContext<C> {
    /// Validate `config`, parse the key and addresses, and check the ABIs.
    pub fn new(config: RegistryConfig, client: C) -> Result<Self, RegistryError> {
        config
            .validate()
            .map_err(|e| RegistryError::Configuration(e.to_string()))?;

        let signer = config
            .wallet
            .private_key
            .as_deref()
            .map(KeyMaterial::from_hex)
            .transpose()
            .map_err(|e| RegistryError::Configuration(format!("wallet private key: {e}")))?;
        let configured = config
            .wallet
            .address
            .as_deref()
            .map(parse_address)
            .transpose()
            .map_err(|e| RegistryError::Configuration(format!("wallet address: {e}")))?;

        let sender = match (&signer, configured) {
            (Some(key), Some(address)) if key.address() != address => {
                return Err(RegistryError::Configuration(format!(
                    "wallet address {} does not match private key ({})",
                    encode_hex(&address),
                    encode_hex(&key.address())
                )));
            }
            (Some(key), _) => key.address(),
            (None, Some(address)) => address,
            (None, None) => {
                return Err(RegistryError::Configuration(
                    "no wallet address or private key".to_string(),
                ))
            }
        };

        let contract = parse_address(&config.contract.address)
            .map_err(|e| RegistryError::Configuration(format!("contract address: {e}")))?;
        let abi = load_abi(config.contract.abi_path.as_deref(), V1_FUNCTIONS)?;

        let (contract_v2, abi_v2) = match config.contract.v2_address.as_deref() {
            Some(address) => {
                let address = parse_address(address).map_err(|e| {
                    RegistryError::Configuration(format!("V2 contract address: {e}"))
                })?;
                let abi = load_abi(config.contract.v2_abi_path.as_deref(), V2_FUNCTIONS)?;
                (Some(address), Some(abi))
            }
            None => (None, None),
        };

        info!(
            sender = %encode_hex(&sender),
            contract = %encode_hex(&contract),
            chain_id = config.network.chain_id,
            v2 = contract_v2.is_some(),
            read_only = signer.is_none(),
            "Document registry context ready"
        );

        Ok(Self {
            config,
            signer,
            sender,
            client,
            contract,
            abi,
            contract_v2,
            abi_v2,
        })
    }
}

fn load_abi(
    path: Option<&Path>,
    functions: &[FunctionSpec],
) -> Result<ContractAbi, RegistryError> {
    let abi = match path {
        Some(path) => ContractAbi::load(path)
            .map_err(|e| RegistryError::Configuration(e.to_string()))?,
        None => ContractAbi::from_specs(functions),
    };
    abi.require(functions)
        .map_err(|e| RegistryError::Configuration(e.to_string()))?;
    Ok(abi)
}

// =============================================================================
// SERVICE
// =============================================================================

/// Document Registry Service.
pub struct DocumentRegistryService<C: ChainClient> {
    ctx: RegistryContext<C>,
    nonces: Mutex<NonceTracker>,
}

impl<C: ChainClient> DocumentRegistryService<C> {
    pub fn new(config: RegistryConfig, client: C) -> Result<Self, RegistryError> {
        Ok(Self::from_context(RegistryContext::new(config, client)?))
    }

    pub fn from_context(ctx: RegistryContext<C>) -> Self {
        Self {
            ctx,
            nonces: Mutex::new(NonceTracker::new()),
        }
    }

    pub fn context(&self) -> &RegistryContext<C> {
        &self.ctx
    }

    pub fn sender(&self) -> Address {
        self.ctx.sender
    }

    fn signer(&self) -> Result<&KeyMaterial, RegistryError> {
        self.ctx.signer.as_ref().ok_or_else(|| {
            RegistryError::Configuration("no private key configured; service is read-only".into())
        })
    }

    fn v2_contract(&self) -> Result<Address, RegistryError> {
        self.ctx.contract_v2.ok_or_else(|| {
            RegistryError::Configuration("V2 registry contract address not configured".into())
        })
    }

    /// Live gas price, or the configured fallback when the node cannot say.
    async fn gas_price(&self) -> U256 {
        let fallback = gwei_to_wei(self.ctx.config.gas.gas_price_gwei);
        match self.ctx.client.gas_price().await {
            Ok(price) if !price.is_zero() => price,
            Ok(_) => {
                warn!(fallback = %fallback, "Node reported zero gas price, using fallback");
                fallback
            }
            Err(e) => {
                warn!(error = %e, fallback = %fallback, "eth_gasPrice failed, using fallback");
                fallback
            }
        }
    }

    /// Build, sign and broadcast `call` to `to`.
    async fn submit(
        &self,
        call: RegistryCall,
        to: Address,
        gas_limit: u64,
    ) -> Result<SubmittedTransaction, RegistryError> {
        let key = self.signer()?;
        let chain_id = self.ctx.config.network.chain_id;
        let function = call.function().name;
        let data = call.encode();
        let gas_price = self.gas_price().await;

        let mut nonces = self.nonces.lock().await;

        let pending = self
            .ctx
            .client
            .get_transaction_count(self.ctx.sender, BlockTag::Pending)
            .await
            .map_err(read_error)?;
        let nonce = nonces.next(pending);

        let tx = UnsignedTransaction {
            nonce,
            gas_price,
            gas_limit: U256::from(gas_limit),
            to: Some(to),
            value: U256::zero(),
            data,
        };
        let signed = tx
            .signing_hash(chain_id)
            .and_then(|hash| hash.sign(key))
            .map_err(|e| RegistryError::SigningFailed(e.to_string()))?;
        let local_hash = signed.tx_hash();

        debug!(function, nonce, tx_hash = %encode_hex(&local_hash), "Broadcasting transaction");

        match self.ctx.client.send_raw_transaction(&signed.raw_hex()).await {
            Ok(tx_hash) => {
                if tx_hash != local_hash {
                    warn!(
                        node = %encode_hex(&tx_hash),
                        local = %encode_hex(&local_hash),
                        "Node reported a different transaction hash"
                    );
                }
                nonces.commit(nonce);
                info!(
                    function,
                    nonce,
                    tx_hash = %encode_hex(&tx_hash),
                    contract = %encode_hex(&to),
                    "Transaction submitted"
                );
                Ok(SubmittedTransaction {
                    tx_hash,
                    status: TransactionStatus::Pending,
                    nonce,
                    contract: to,
                })
            }
            Err(ChainError::Rpc {
                code,
                message,
                data,
            }) => {
                let message = rejection_message(message, data.as_deref());
                error!(function, nonce, code, message = %message, "Transaction rejected");
                Err(RegistryError::BroadcastRejected { code, message })
            }
            Err(ChainError::Connection(endpoint)) => {
                warn!(function, nonce, endpoint = %endpoint, "Node unreachable, nothing sent");
                Err(RegistryError::Network(format!("cannot connect to {endpoint}")))
            }
            Err(e) => {
                nonces.reset();
                let tx_hash = encode_hex(&local_hash);
                warn!(
                    function,
                    nonce,
                    tx_hash = %tx_hash,
                    error = %e,
                    "Broadcast outcome unknown"
                );
                Err(RegistryError::BroadcastUnknown { tx_hash })
            }
        }
    }

    /// `eth_call`; `Ok(None)` when the contract reverted.
    async fn read(&self, to: Address, call: &RegistryCall) -> Result<Option<Vec<u8>>, RegistryError> {
        match self.ctx.client.call(to, &call.encode()).await {
            Ok(data) => Ok(Some(data)),
            Err(ChainError::Rpc {
                code,
                message,
                data,
            }) if is_revert(code, &message) => {
                debug!(
                    function = call.function().name,
                    reason = %rejection_message(message, data.as_deref()),
                    "Call reverted"
                );
                Ok(None)
            }
            Err(e) => Err(read_error(e)),
        }
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Translate a failed read.
fn read_error(e: ChainError) -> RegistryError {
    match e {
        ChainError::Timeout(m) => RegistryError::NetworkTimeout(m),
        ChainError::Connection(m) | ChainError::Transport(m) => RegistryError::Network(m),
        ChainError::Rpc { code, message, .. } => {
            RegistryError::Network(format!("RPC error {code}: {message}"))
        }
        ChainError::InvalidResponse(m) => RegistryError::Decode(m),
    }
}

/// Geth reports reverts with code 3; other nodes only say so in the message.
fn is_revert(code: i64, message: &str) -> bool {
    code == 3 || message.to_ascii_lowercase().contains("revert")
}

/// The node's message, with the decoded revert reason appended when the
/// message does not already carry it.
fn rejection_message(message: String, data: Option<&str>) -> String {
    let reason = data
        .and_then(|d| decode_hex(d).ok())
        .and_then(|bytes| decode_revert_reason(&bytes));
    match reason {
        Some(reason) if !message.contains(&reason) => format!("{message}: {reason}"),
        _ => message,
    }
}

fn expiry(value: Option<u64>) -> u64 {
    value.unwrap_or(0)
}

#[async_trait]
impl<C: ChainClient> DocumentRegistryApi for DocumentRegistryService<C> {
    async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<SubmittedTransaction, RegistryError> {
        let document_id = parse_document_id(&request.document_id)?;
        let document_hash = parse_content_hash(&request.document_hash)?;

        let metadata_keys: Vec<&str> = request.metadata.keys().map(String::as_str).collect();
        info!(
            document_id = %request.document_id,
            document_type = %request.document_type,
            metadata_keys = ?metadata_keys,
            "Registering document"
        );

        let call = RegistryCall::Register(RegisterCall {
            document_id,
            document_hash,
            document_type: request.document_type,
            expiry_date: expiry(request.expiry_date),
        });
        self.submit(call, self.ctx.contract, self.ctx.config.gas.gas_limit)
            .await
    }

    async fn revoke(
        &self,
        document_id: &str,
        reason: &str,
    ) -> Result<SubmittedTransaction, RegistryError> {
        let id = parse_document_id(document_id)?;
        info!(document_id, reason, "Revoking document");

        let call = RegistryCall::Revoke(RevokeCall { document_id: id });
        self.submit(call, self.ctx.contract, self.ctx.config.gas.gas_limit)
            .await
    }

    async fn reissue(
        &self,
        request: ReissueRequest,
    ) -> Result<SubmittedTransaction, RegistryError> {
        let call = RegistryCall::Reissue(ReissueCall {
            old_document_id: parse_document_id(&request.old_document_id)?,
            new_document_id: parse_document_id(&request.new_document_id)?,
            new_document_hash: parse_content_hash(&request.new_document_hash)?,
            document_type: request.document_type,
            expiry_date: expiry(request.expiry_date),
        });
        info!(
            old_document_id = %request.old_document_id,
            new_document_id = %request.new_document_id,
            "Reissuing document"
        );
        self.submit(call, self.ctx.contract, self.ctx.config.gas.gas_limit)
            .await
    }

    async fn register_v2(
        &self,
        request: RegisterV2Request,
    ) -> Result<SubmittedTransaction, RegistryError> {
        let contract = self.v2_contract()?;
        let document_id = parse_document_id(&request.document_id)?;
        let pdf_hash = parse_content_hash(&request.pdf_hash)?;
        if request.document_number.trim().is_empty() {
            return Err(RegistryError::InvalidFormat(
                "document number must not be empty".to_string(),
            ));
        }

        info!(
            document_id = %request.document_id,
            document_number = %request.document_number,
            ipfs = request.ipfs_hash.is_some(),
            "Registering document (V2)"
        );

        let call = RegistryCall::RegisterV2(RegisterV2Call {
            document_id,
            document_type: request.document_type,
            document_number: request.document_number,
            document_title: request.document_title,
            issued_date: request.issued_date,
            effective_from: request.effective_from,
            effective_until: expiry(request.effective_until),
            expiry_date: expiry(request.expiry_date),
            is_permanent: request.is_permanent,
            issuer_name: request.issuer_name,
            issuer_country: request.issuer_country,
            issuer_registration_number: request.issuer_registration_number,
            holder_full_name: request.holder_full_name,
            holder_id_number: request.holder_id_number,
            holder_nationality: request.holder_nationality,
            ipfs_hash: request.ipfs_hash.unwrap_or_default(),
            pdf_hash,
        });
        self.submit(call, contract, self.ctx.config.gas.gas_limit_v2)
            .await
    }

    async fn verify(
        &self,
        document_id: &str,
    ) -> Result<VerifyOutcome<DocumentRecord>, RegistryError> {
        let id = parse_document_id(document_id)?;
        let call = RegistryCall::GetDocument(GetDocumentCall { document_id: id });

        let outcome = match self.read(self.ctx.contract, &call).await? {
            Some(data) => decode_document(&data)
                .map_err(|e| RegistryError::Decode(e.to_string()))?
                .into(),
            None => VerifyOutcome::NotFound,
        };
        debug!(document_id, found = outcome.is_found(), "Verified document");
        Ok(outcome)
    }

    async fn is_valid(&self, document_id: &str) -> Result<bool, RegistryError> {
        let id = parse_document_id(document_id)?;
        let call = RegistryCall::IsDocumentValid(IsDocumentValidCall { document_id: id });

        match self.read(self.ctx.contract, &call).await? {
            Some(data) => decode_bool(&data).map_err(|e| RegistryError::Decode(e.to_string())),
            None => Ok(false),
        }
    }

    async fn document_metadata(
        &self,
        document_id: &str,
    ) -> Result<VerifyOutcome<DocumentRecordV2>, RegistryError> {
        let contract = self.v2_contract()?;
        let id = parse_document_id(document_id)?;
        let call = RegistryCall::GetDocumentV2(GetDocumentCall { document_id: id });

        match self.read(contract, &call).await? {
            Some(data) => Ok(decode_document_v2(&data)
                .map_err(|e| RegistryError::Decode(e.to_string()))?
                .into()),
            None => Ok(VerifyOutcome::NotFound),
        }
    }

    async fn verify_content(
        &self,
        document_id: &str,
        content: &[u8],
    ) -> Result<ContentCheck, RegistryError> {
        let record = match self.verify(document_id).await? {
            VerifyOutcome::Found(record) => record,
            VerifyOutcome::NotFound => return Ok(ContentCheck::NotFound),
        };

        if verify_content_hash(content, &encode_hex(&record.document_hash))? {
            Ok(ContentCheck::Match)
        } else {
            Ok(ContentCheck::Mismatch {
                on_chain: record.document_hash,
                computed: hash_content(content),
            })
        }
    }

    async fn check_status(&self, tx_hash: &str) -> Result<TransactionStatus, RegistryError> {
        let hash = parse_tx_hash(tx_hash)?;

        let status = match self.ctx.client.get_transaction_receipt(hash).await {
            Ok(Some(receipt)) => match receipt.block_number {
                Some(block_number) if receipt.succeeded() => {
                    TransactionStatus::Confirmed { block_number }
                }
                Some(block_number) => TransactionStatus::Failed { block_number },
                None => TransactionStatus::Pending,
            },
            Ok(None) => TransactionStatus::Pending,
            Err(e) => {
                warn!(tx_hash, error = %e, "Receipt lookup failed, reporting pending");
                TransactionStatus::Pending
            }
        };
        debug!(tx_hash, status = status.as_str(), "Checked transaction status");
        Ok(status)
    }
}

// =============================================================================
// TESTS
// =============================================================================
