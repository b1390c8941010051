//! The network client boundary.
//!
//! [`ChainClient`] is everything the deployer, faucet filler and scenarios
//! need from a chain. [`SecretNetworkClient`](crate::SecretNetworkClient)
//! implements it against a live node; tests swap in an in-memory double.

use std::future::Future;
use std::sync::Arc;

use sdk_core::Coin;
use serde_json::Value;

use crate::{SdkError, TxResponse};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// An instantiated contract: its address and the hash its messages are
/// bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRef {
    pub code_hash: String,
    pub address: String,
}

/// Input for [`ChainClient::instantiate_contract`].
#[derive(Debug, Clone)]
pub struct InstantiateRequest {
    pub code_id: u64,
    pub code_hash: String,
    pub label: String,
    pub init_msg: Value,
}

/// Input for [`ChainClient::execute_contract`].
#[derive(Debug, Clone)]
pub struct ExecuteRequest {
    pub contract: ContractRef,
    pub msg: Value,
    /// Funds transferred to the contract alongside the message.
    pub sent_funds: Vec<Coin>,
}

impl ExecuteRequest {
    /// An execute request with no attached funds.
    pub fn new(contract: &ContractRef, msg: Value) -> Self {
        Self {
            contract: contract.clone(),
            msg,
            sent_funds: Vec::new(),
        }
    }

    /// Attaches funds to send with the message.
    pub fn with_funds(mut self, funds: impl IntoIterator<Item = Coin>) -> Self {
        self.sent_funds.extend(funds);
        self
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A wallet-bound client for one chain.
///
/// Transaction methods resolve once the tx is included in a block. A
/// rejected tx is *not* an `Err`: it returns a [`TxResponse`] with a
/// non-zero `code` and the chain's `raw_log`.
pub trait ChainClient: Send + Sync {
    /// The bech32 address of the bound wallet.
    fn address(&self) -> &str;

    /// Current balance of the bound wallet in `denom`.
    fn balance(&self, denom: &str) -> impl Future<Output = Result<u128, SdkError>> + Send;

    /// Uploads a contract binary.
    fn store_code(
        &self,
        wasm: Vec<u8>,
        gas_limit: u64,
    ) -> impl Future<Output = Result<TxResponse, SdkError>> + Send;

    /// Resolves the code hash of an uploaded code id, `None` if unknown.
    fn code_hash_by_code_id(
        &self,
        code_id: u64,
    ) -> impl Future<Output = Result<Option<String>, SdkError>> + Send;

    /// Instantiates uploaded code.
    fn instantiate_contract(
        &self,
        request: InstantiateRequest,
        gas_limit: u64,
    ) -> impl Future<Output = Result<TxResponse, SdkError>> + Send;

    /// Executes a message against a contract.
    fn execute_contract(
        &self,
        request: ExecuteRequest,
        gas_limit: u64,
    ) -> impl Future<Output = Result<TxResponse, SdkError>> + Send;

    /// Runs a smart query and returns the contract's JSON answer.
    fn query_contract(
        &self,
        contract: &ContractRef,
        query: &Value,
    ) -> impl Future<Output = Result<Value, SdkError>> + Send;
}

impl<T: ChainClient> ChainClient for Arc<T> {
    fn address(&self) -> &str {
        (**self).address()
    }

    fn balance(&self, denom: &str) -> impl Future<Output = Result<u128, SdkError>> + Send {
        (**self).balance(denom)
    }

    fn store_code(
        &self,
        wasm: Vec<u8>,
        gas_limit: u64,
    ) -> impl Future<Output = Result<TxResponse, SdkError>> + Send {
        (**self).store_code(wasm, gas_limit)
    }

    fn code_hash_by_code_id(
        &self,
        code_id: u64,
    ) -> impl Future<Output = Result<Option<String>, SdkError>> + Send {
        (**self).code_hash_by_code_id(code_id)
    }

    fn instantiate_contract(
        &self,
        request: InstantiateRequest,
        gas_limit: u64,
    ) -> impl Future<Output = Result<TxResponse, SdkError>> + Send {
        (**self).instantiate_contract(request, gas_limit)
    }

    fn execute_contract(
        &self,
        request: ExecuteRequest,
        gas_limit: u64,
    ) -> impl Future<Output = Result<TxResponse, SdkError>> + Send {
        (**self).execute_contract(request, gas_limit)
    }

    fn query_contract(
        &self,
        contract: &ContractRef,
        query: &Value,
    ) -> impl Future<Output = Result<Value, SdkError>> + Send {
        (**self).query_contract(contract, query)
    }
}
