//! In-memory [`ChainClient`] for tests.
//!
//! [`MockChain`] answers from scripted state and records every call.
//! Responses for each tx kind are consumed in FIFO order; running out of
//! scripted responses is an error, not a panic, so tests can assert on it.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;

use crate::chain::{ChainClient, ContractRef, ExecuteRequest, InstantiateRequest};
use crate::tx_response::{Event, TxLog};
use crate::{SdkError, TxResponse};

/// A call observed by [`MockChain`].
#[derive(Debug, Clone)]
pub enum Call {
    Balance { denom: String },
    StoreCode { size: usize, gas_limit: u64 },
    CodeHash { code_id: u64 },
    Instantiate { request: InstantiateRequest, gas_limit: u64 },
    Execute { request: ExecuteRequest, gas_limit: u64 },
    Query { contract: ContractRef, query: Value },
}

#[derive(Default)]
struct MockState {
    balance: u128,
    balance_error: Option<String>,
    code_hashes: HashMap<u64, String>,
    store: VecDeque<TxResponse>,
    instantiate: VecDeque<TxResponse>,
    execute: VecDeque<TxResponse>,
    queries: VecDeque<Result<Value, String>>,
    calls: Vec<Call>,
}

/// Scripted chain bound to a fixed address.
pub struct MockChain {
    address: String,
    state: Mutex<MockState>,
}

impl std::fmt::Debug for MockChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockChain")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl MockChain {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            state: Mutex::new(MockState::default()),
        }
    }

    // -- scripting ----------------------------------------------------------

    pub fn with_balance(self, balance: u128) -> Self {
        self.lock().balance = balance;
        self
    }

    /// Every balance query fails with a transport error.
    pub fn with_failing_balance(self, message: impl Into<String>) -> Self {
        self.lock().balance_error = Some(message.into());
        self
    }

    pub fn with_code_hash(self, code_id: u64, code_hash: impl Into<String>) -> Self {
        self.lock().code_hashes.insert(code_id, code_hash.into());
        self
    }

    pub fn with_store_response(self, tx: TxResponse) -> Self {
        self.lock().store.push_back(tx);
        self
    }

    pub fn with_instantiate_response(self, tx: TxResponse) -> Self {
        self.lock().instantiate.push_back(tx);
        self
    }

    pub fn with_execute_response(self, tx: TxResponse) -> Self {
        self.lock().execute.push_back(tx);
        self
    }

    pub fn with_query_response(self, answer: Value) -> Self {
        self.lock().queries.push_back(Ok(answer));
        self
    }

    /// The next query is rejected by the "contract".
    pub fn with_query_error(self, message: impl Into<String>) -> Self {
        self.lock().queries.push_back(Err(message.into()));
        self
    }

    /// Adds to the balance, as a faucet payout would.
    pub fn credit(&self, amount: u128) {
        self.lock().balance += amount;
    }

    // -- inspection ---------------------------------------------------------

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn current_balance(&self) -> u128 {
        self.lock().balance
    }

    // -- tx builders --------------------------------------------------------

    /// A successful tx whose first log batch holds `events`.
    pub fn tx_with_events(events: Vec<Event>) -> TxResponse {
        TxResponse {
            tx_hash: "MOCKTX".to_owned(),
            height: 1,
            gas_wanted: 200_000,
            gas_used: 100_000,
            json_log: vec![TxLog {
                msg_index: 0,
                events,
            }],
            ..Default::default()
        }
    }

    /// A rejected tx.
    pub fn failed_tx(code: u32, raw_log: impl Into<String>) -> TxResponse {
        TxResponse {
            tx_hash: "MOCKTX".to_owned(),
            code,
            raw_log: raw_log.into(),
            ..Default::default()
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // Poisoning is ignored.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_tx(queue: &mut VecDeque<TxResponse>, kind: &str) -> Result<TxResponse, SdkError> {
        queue
            .pop_front()
            .ok_or_else(|| SdkError::InvalidPayload(format!("no scripted {kind} response")))
    }
}

impl ChainClient for MockChain {
    fn address(&self) -> &str {
        &self.address
    }

    async fn balance(&self, denom: &str) -> Result<u128, SdkError> {
        let mut state = self.lock();
        state.calls.push(Call::Balance {
            denom: denom.to_owned(),
        });
        match &state.balance_error {
            Some(message) => Err(SdkError::Transport(transport::LcdError::Request(
                message.clone(),
            ))),
            None => Ok(state.balance),
        }
    }

    async fn store_code(&self, wasm: Vec<u8>, gas_limit: u64) -> Result<TxResponse, SdkError> {
        let mut state = self.lock();
        state.calls.push(Call::StoreCode {
            size: wasm.len(),
            gas_limit,
        });
        Self::next_tx(&mut state.store, "store")
    }

    async fn code_hash_by_code_id(&self, code_id: u64) -> Result<Option<String>, SdkError> {
        let mut state = self.lock();
        state.calls.push(Call::CodeHash { code_id });
        Ok(state.code_hashes.get(&code_id).cloned())
    }

    async fn instantiate_contract(
        &self,
        request: InstantiateRequest,
        gas_limit: u64,
    ) -> Result<TxResponse, SdkError> {
        let mut state = self.lock();
        state.calls.push(Call::Instantiate { request, gas_limit });
        Self::next_tx(&mut state.instantiate, "instantiate")
    }

    async fn execute_contract(
        &self,
        request: ExecuteRequest,
        gas_limit: u64,
    ) -> Result<TxResponse, SdkError> {
        let mut state = self.lock();
        state.calls.push(Call::Execute { request, gas_limit });
        Self::next_tx(&mut state.execute, "execute")
    }

    async fn query_contract(
        &self,
        contract: &ContractRef,
        query: &Value,
    ) -> Result<Value, SdkError> {
        let mut state = self.lock();
        state.calls.push(Call::Query {
            contract: contract.clone(),
            query: query.clone(),
        });
        match state.queries.pop_front() {
            Some(Ok(answer)) => Ok(answer),
            Some(Err(message)) => Err(SdkError::QueryFailed(message)),
            None => Err(SdkError::InvalidPayload("no scripted query response".into())),
        }
    }
}
