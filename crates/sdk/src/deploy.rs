//! Contract deployment: upload, resolve the code hash, instantiate.
//!
//! | Step | Chain call | Extracted |
//! |------|------------|-----------|
//! | Upload | `MsgStoreCode` (5M gas) | `code_id` from the first event of the first log batch |
//! | Resolve | code hash query | non-empty `code_hash` |
//! | Instantiate | `MsgInstantiateContract` (1M gas) | `message.contract_address` from the flattened log |
//!
//! Every step is fatal on failure. A [`ContractRef`] is only returned once
//! all three succeeded.

use std::fmt;
use std::path::{Path, PathBuf};

use config::constants::{INSTANTIATE_GAS_LIMIT, LABEL_PREFIX, LABEL_SUFFIX_MAX, UPLOAD_GAS_LIMIT};
use rand::Rng;
use serde_json::Value;

use crate::chain::{ChainClient, ContractRef, InstantiateRequest};
use crate::{SdkError, events};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from [`initialize_contract`].
#[derive(Debug)]
pub enum DeployError {
    /// The contract binary could not be read.
    ReadContract { path: PathBuf, reason: String },

    /// A chain call failed before producing a tx result.
    Sdk(SdkError),

    /// The upload tx was rejected.
    UploadFailed { code: u32, raw_log: String },

    /// An expected attribute was missing from a tx log.
    MissingField { event: String, key: String },

    /// The `code_id` attribute was not an integer.
    InvalidCodeId(String),

    /// The chain returned no code hash for the uploaded code.
    MissingCodeHash { code_id: u64 },

    /// The instantiate tx was rejected.
    InstantiateFailed { code: u32, raw_log: String },
}

impl fmt::Display for DeployError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadContract { path, reason } => {
                write!(f, "cannot read contract {}: {reason}", path.display())
            }
            Self::Sdk(e) => write!(f, "{e}"),
            Self::UploadFailed { code, raw_log } => {
                write!(f, "upload failed with code {code}: {raw_log}")
            }
            Self::MissingField { event, key } => {
                write!(f, "attribute `{key}` not found on event `{event}`")
            }
            Self::InvalidCodeId(raw) => write!(f, "invalid code id `{raw}`"),
            Self::MissingCodeHash { code_id } => write!(f, "no code hash for code id {code_id}"),
            Self::InstantiateFailed { code, raw_log } => {
                write!(f, "instantiate failed with code {code}: {raw_log}")
            }
        }
    }
}

impl std::error::Error for DeployError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sdk(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SdkError> for DeployError {
    fn from(e: SdkError) -> Self {
        match e {
            SdkError::MissingField { event, key } => Self::MissingField { event, key },
            other => Self::Sdk(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs for a deployment. Defaults match the harness constants.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Label prefix; a random suffix in `1..=10000` is appended.
    pub label_prefix: String,
    pub upload_gas_limit: u64,
    pub instantiate_gas_limit: u64,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            label_prefix: LABEL_PREFIX.to_owned(),
            upload_gas_limit: UPLOAD_GAS_LIMIT,
            instantiate_gas_limit: INSTANTIATE_GAS_LIMIT,
        }
    }
}

/// `"<prefix><n>"` with `n` uniform in `1..=10000`.
///
/// Labels must be unique per chain. Two deploys can still collide with
/// probability 1/10000.
pub fn unique_label(prefix: &str) -> String {
    let suffix = rand::thread_rng().gen_range(1..=LABEL_SUFFIX_MAX);
    format!("{prefix}{suffix}")
}

// ---------------------------------------------------------------------------
// Deployment
// ---------------------------------------------------------------------------

/// Reads the contract at `path`, then uploads and instantiates it.
///
/// # Errors
///
/// See [`DeployError`]; every failure aborts the deployment.
pub async fn initialize_contract(
    client: &impl ChainClient,
    path: impl AsRef<Path>,
    init_msg: Value,
) -> Result<ContractRef, DeployError> {
    let wasm = read_contract(path).await?;
    initialize_contract_with(client, wasm, init_msg, &DeployOptions::default()).await
}

/// Reads a compiled contract binary.
///
/// # Errors
///
/// Returns [`DeployError::ReadContract`] if the file cannot be read.
pub async fn read_contract(path: impl AsRef<Path>) -> Result<Vec<u8>, DeployError> {
    let path = path.as_ref();
    tokio::fs::read(path)
        .await
        .map_err(|e| DeployError::ReadContract {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Uploads and instantiates an in-memory contract binary.
///
/// # Errors
///
/// See [`DeployError`]; every failure aborts the deployment.
pub async fn initialize_contract_with(
    client: &impl ChainClient,
    wasm: Vec<u8>,
    init_msg: Value,
    options: &DeployOptions,
) -> Result<ContractRef, DeployError> {
    let upload = client.store_code(wasm, options.upload_gas_limit).await?;
    if !upload.is_success() {
        return Err(DeployError::UploadFailed {
            code: upload.code,
            raw_log: upload.raw_log,
        });
    }

    let raw_code_id = events::find_first_event_attribute(&upload, "code_id").ok_or_else(|| {
        DeployError::MissingField {
            event: "message".to_owned(),
            key: "code_id".to_owned(),
        }
    })?;
    let code_id: u64 = raw_code_id
        .trim()
        .parse()
        .map_err(|_| DeployError::InvalidCodeId(raw_code_id.to_owned()))?;
    tracing::info!(code_id, gas_used = upload.gas_used, "contract code uploaded");

    let code_hash = client
        .code_hash_by_code_id(code_id)
        .await?
        .filter(|hash| !hash.is_empty())
        .ok_or(DeployError::MissingCodeHash { code_id })?;
    tracing::info!(code_id, code_hash = %code_hash, "contract code hash resolved");

    let label = unique_label(&options.label_prefix);
    let request = InstantiateRequest {
        code_id,
        code_hash: code_hash.clone(),
        label: label.clone(),
        init_msg,
    };
    let instantiate = client
        .instantiate_contract(request, options.instantiate_gas_limit)
        .await?;
    if !instantiate.is_success() {
        return Err(DeployError::InstantiateFailed {
            code: instantiate.code,
            raw_log: instantiate.raw_log,
        });
    }

    let address = events::require_array_log(&instantiate, "message", "contract_address")?;
    tracing::info!(
        address = %address,
        label = %label,
        gas_used = instantiate.gas_used,
        "contract instantiated"
    );

    Ok(ContractRef {
        code_hash,
        address: address.to_owned(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
