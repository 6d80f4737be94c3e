//! Subcommand handlers and JSON rendering.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use tracing::{info, warn};

use dr_02_transaction_signing::KeyMaterial;
use dr_03_contract_codec::DocumentRecord;
use dr_04_chain_client::{ChainClient, HttpChainClient};
use dr_05_document_registry::{
    ContentCheck, DocumentRegistryApi, DocumentRegistryService, RegisterRequest, RegistryConfig,
    SubmittedTransaction, TransactionStatus, VerifyOutcome,
};
use shared_types::{encode_hex, hash_file};

use crate::{Args, Command};

type Service = DocumentRegistryService<HttpChainClient>;

pub async fn run(args: Args) -> Result<ExitCode> {
    match args.command {
        Command::Hash { file } => {
            let hash = hash_file(&file).with_context(|| format!("reading {}", file.display()))?;
            print_json(&json!({ "file": file.display().to_string(), "sha256": encode_hex(&hash) }))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Address => {
            let config = load_config(args.config.as_deref())?;
            let key = config
                .wallet
                .private_key
                .as_deref()
                .context("BLOCKCHAIN_WALLET_PRIVATE_KEY is not set")?;
            let key = KeyMaterial::from_hex(key)?;
            print_json(&json!({ "address": encode_hex(&key.address()) }))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Register {
            id,
            file,
            hash,
            document_type,
            expiry,
            metadata,
        } => {
            let document_hash = match (file, hash) {
                (Some(file), _) => encode_hex(
                    &hash_file(&file).with_context(|| format!("reading {}", file.display()))?,
                ),
                (None, Some(hash)) => hash,
                (None, None) => bail!("either --file or --hash is required"),
            };
            let service = connect(args.config.as_deref(), true).await?;
            let submitted = service
                .register(RegisterRequest {
                    document_id: id,
                    document_hash,
                    document_type,
                    expiry_date: expiry,
                    metadata: metadata.into_iter().collect::<BTreeMap<_, _>>(),
                })
                .await?;
            print_json(&submitted_json(&submitted))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Revoke { id, reason } => {
            let service = connect(args.config.as_deref(), true).await?;
            let submitted = service.revoke(&id, &reason).await?;
            print_json(&submitted_json(&submitted))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { id, file } => {
            let service = connect(args.config.as_deref(), false).await?;
            match file {
                Some(file) => {
                    let content = std::fs::read(&file)
                        .with_context(|| format!("reading {}", file.display()))?;
                    let check = service.verify_content(&id, &content).await?;
                    print_json(&content_json(&id, &check))?;
                    Ok(exit_for(check == ContentCheck::Match))
                }
                None => {
                    let outcome = service.verify(&id).await?;
                    let found = outcome.is_found();
                    let valid = if found { service.is_valid(&id).await? } else { false };
                    print_json(&record_json(&id, &outcome, valid))?;
                    Ok(exit_for(found))
                }
            }
        }
        Command::Status { tx_hash } => {
            let service = connect(args.config.as_deref(), false).await?;
            let status = service.check_status(&tx_hash).await?;
            print_json(&status_json(&tx_hash, status))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Config from `path` when given, the environment otherwise.
pub fn load_config(path: Option<&Path>) -> Result<RegistryConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
        }
        None => RegistryConfig::from_env().context("reading config from environment"),
    }
}

async fn connect(path: Option<&Path>, writes: bool) -> Result<Service> {
    let config = load_config(path)?;
    let client = HttpChainClient::with_timeout(
        config.network.rpc_url.clone(),
        Duration::from_secs(config.network.rpc_timeout_secs),
    )?;
    let service = DocumentRegistryService::new(config, client)?;

    if writes {
        let ctx = service.context();
        let expected = ctx.config.network.chain_id;
        match ctx.client.chain_id().await {
            Ok(actual) if actual != expected => {
                bail!("node reports chain id {actual}, configuration says {expected}")
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Could not confirm chain id"),
        }
    }

    info!(sender = %encode_hex(&service.sender()), "Connected");
    Ok(service)
}

fn exit_for(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `key=value` for `--meta`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

// =============================================================================
// JSON RENDERING
// =============================================================================

fn submitted_json(submitted: &SubmittedTransaction) -> Value {
    json!({
        "tx_hash": encode_hex(&submitted.tx_hash),
        "status": submitted.status.as_str(),
        "nonce": submitted.nonce,
        "contract": encode_hex(&submitted.contract),
    })
}

fn status_json(tx_hash: &str, status: TransactionStatus) -> Value {
    let block_number = match status {
        TransactionStatus::Confirmed { block_number } | TransactionStatus::Failed { block_number } => {
            Some(block_number)
        }
        TransactionStatus::Pending => None,
    };
    json!({
        "tx_hash": tx_hash,
        "status": status.as_str(),
        "block_number": block_number,
    })
}

fn record_json(id: &str, outcome: &VerifyOutcome<DocumentRecord>, valid: bool) -> Value {
    match outcome {
        VerifyOutcome::NotFound => json!({ "document_id": id, "found": false }),
        VerifyOutcome::Found(record) => json!({
            "document_id": encode_hex(&record.document_id),
            "found": true,
            "valid": valid,
            "issuer": encode_hex(&record.issuer),
            "document_hash": encode_hex(&record.document_hash),
            "document_type": record.document_type,
            "issued_at": record.issued_at,
            "expiry_date": (record.expiry_date != 0).then_some(record.expiry_date),
            "revoked": record.revoked,
            "previous_version": record.previous_version.map(|h| encode_hex(&h)),
        }),
    }
}

fn content_json(id: &str, check: &ContentCheck) -> Value {
    match check {
        ContentCheck::Match => json!({ "document_id": id, "found": true, "matches": true }),
        ContentCheck::Mismatch { on_chain, computed } => json!({
            "document_id": id,
            "found": true,
            "matches": false,
            "on_chain_hash": encode_hex(on_chain),
            "computed_hash": encode_hex(computed),
        }),
        ContentCheck::NotFound => json!({ "document_id": id, "found": false }),
    }
}
