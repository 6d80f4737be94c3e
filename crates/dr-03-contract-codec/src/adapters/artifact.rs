//! # Contract ABI Artifacts
//!
//! Loads the compiled contract interface once at startup and checks that
//! every function the registry will call exists with the expected input
//! types. Accepts either a bare ABI array or a compiler artifact holding the
//! array under `"abi"`.

use crate::domain::abi::FunctionSpec;
use crate::domain::errors::AbiError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
}

#[derive(Debug, Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AbiDocument {
    Entries(Vec<AbiEntry>),
    Artifact { abi: Vec<AbiEntry> },
}

/// Function signatures published by a contract ABI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAbi {
    signatures: Vec<String>,
}

impl ContractAbi {
    /// Read and parse an ABI file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AbiError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| AbiError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let abi = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            functions = abi.signatures.len(),
            "Loaded contract ABI"
        );
        Ok(abi)
    }

    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let document: AbiDocument =
            serde_json::from_str(json).map_err(|e| AbiError::MalformedJson(e.to_string()))?;
        let entries = match document {
            AbiDocument::Entries(entries) => entries,
            AbiDocument::Artifact { abi } => abi,
        };

        let signatures = entries
            .into_iter()
            .filter(|entry| entry.kind == "function")
            .map(|entry| {
                let inputs: Vec<String> = entry.inputs.into_iter().map(|p| p.kind).collect();
                format!("{}({})", entry.name, inputs.join(","))
            })
            .collect();

        Ok(Self { signatures })
    }

    /// An ABI containing exactly `specs`, for deployments without an ABI file.
    pub fn from_specs(specs: &[FunctionSpec]) -> Self {
        Self {
            signatures: specs.iter().map(FunctionSpec::signature).collect(),
        }
    }

    pub fn has_function(&self, spec: &FunctionSpec) -> bool {
        let signature = spec.signature();
        self.signatures.iter().any(|s| *s == signature)
    }

    /// Fail on the first function in `specs` the ABI does not declare.
    pub fn require(&self, specs: &[FunctionSpec]) -> Result<(), AbiError> {
        for spec in specs {
            if !self.has_function(spec) {
                return Err(AbiError::MissingFunction(spec.signature()));
            }
            debug!(function = %spec.signature(), "ABI function present");
        }
        Ok(())
    }

    pub fn signatures(&self) -> &[String] {
        &self.signatures
    }
}
