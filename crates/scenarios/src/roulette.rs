//! Roulette contract scenarios.
//!
//! The contract takes a list of bets per spin and reports the spin in a
//! `roulette_result` event. Message shapes mirror the contract's
//! `snake_case` serde encoding, e.g.
//! `{"bet":{"bets":[{"amount":{"denom":"uscrt","amount":"1000"},"result":{"exact":{"num":31}}}]}}`.

use std::path::Path;

use config::NetworkConfig;
use config::constants::{EXECUTE_GAS_LIMIT, NATIVE_DENOM};
use sdk::events;
use sdk::scenario::run_test_function;
use sdk::{ChainClient, ContractRef, ExecuteRequest, SdkError, TxResponse};
use serde::Serialize;
use serde_json::Value;

use crate::{ScenarioError, harness};

/// Event carrying the outcome of a spin.
pub const RESULT_EVENT: &str = "wasm-wasm-roulette_result";

// ---------------------------------------------------------------------------
// Contract interface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstantiateMsg {
    pub min_bet: Option<u64>,
    pub max_bet: Option<u64>,
    pub max_total: Option<u64>,
    pub supported_denoms: Option<Vec<String>>,
}

impl Default for InstantiateMsg {
    fn default() -> Self {
        Self {
            min_bet: Some(5),
            max_bet: Some(1_000),
            max_total: Some(1_000_000),
            supported_denoms: Some(vec![NATIVE_DENOM.to_owned()]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    Bet { bets: Vec<Bet> },
}

/// A cosmwasm coin: the amount travels as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireCoin {
    pub denom: String,
    pub amount: String,
}

impl From<&sdk_core::Coin> for WireCoin {
    fn from(coin: &sdk_core::Coin) -> Self {
        Self {
            denom: coin.denom.clone(),
            amount: coin.amount.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bet {
    pub amount: WireCoin,
    pub result: GameResult,
}

/// What a bet wagers on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Exact { num: u32 },
    Red,
    Black,
    Range1to12,
    Range13to24,
    Range25to36,
    Odd,
    Even,
    /// 1, 4, 7, 10...
    Range2to1First,
    /// 2, 5, 8, 11...
    Range2to1Second,
    /// 3, 6, 9, 12...
    Range2to1Third,
    Line { nums: (u32, u32) },
    Corner { nums: (u32, u32, u32, u32) },
    Range1to18,
    Range19to36,
}

/// Init message of the contract.
pub fn init_msg() -> Value {
    serde_json::to_value(InstantiateMsg::default()).unwrap_or_default()
}

/// Places `bets`, sending their total stake along.
///
/// # Errors
///
/// Returns an error if the tx cannot be submitted. A rejected tx is
/// returned as-is.
pub async fn place_bets(
    client: &impl ChainClient,
    contract: &ContractRef,
    bets: &[(sdk_core::Coin, GameResult)],
) -> Result<TxResponse, SdkError> {
    let msg = ExecuteMsg::Bet {
        bets: bets
            .iter()
            .map(|(amount, result)| Bet {
                amount: amount.into(),
                result: result.clone(),
            })
            .collect(),
    };
    let msg = serde_json::to_value(&msg).map_err(|e| SdkError::InvalidPayload(e.to_string()))?;
    let funds = bets.iter().map(|(amount, _)| amount.clone());

    let tx = client
        .execute_contract(
            ExecuteRequest::new(contract, msg).with_funds(funds),
            EXECUTE_GAS_LIMIT,
        )
        .await?;
    tracing::info!(gas_used = tx.gas_used, code = tx.code, "bet tx executed");
    Ok(tx)
}

/// The numeric outcome of a spin: the second attribute of the
/// [`RESULT_EVENT`].
///
/// # Errors
///
/// Fails if the event or attribute is missing or the value is not a finite
/// number.
pub fn spin_result(tx: &TxResponse) -> Result<f64, ScenarioError> {
    let attributes = events::event_attributes(tx, RESULT_EVENT).ok_or_else(|| {
        ScenarioError::Assertion(format!(
            "no {RESULT_EVENT} event in tx response: {}",
            tx.to_json()
        ))
    })?;
    let raw = attributes.get(1).map(|a| a.value.as_str()).ok_or_else(|| {
        ScenarioError::Assertion(format!(
            "{RESULT_EVENT} has {} attributes, expected at least 2",
            attributes.len()
        ))
    })?;
    let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    value.ok_or_else(|| ScenarioError::Assertion(format!("spin result `{raw}` is not a number")))
}

// ---------------------------------------------------------------------------
// Scenario tests
// ---------------------------------------------------------------------------

/// Bets 1000uscrt on 31 and checks that a numeric result is reported.
///
/// # Errors
///
/// Fails if the tx is rejected or the result is missing or malformed.
pub async fn test_bet_exact_number(
    client: &impl ChainClient,
    contract: &ContractRef,
) -> Result<f64, ScenarioError> {
    let stake = sdk_core::Coin::new(1_000, NATIVE_DENOM);
    let tx = place_bets(client, contract, &[(stake, GameResult::Exact { num: 31 })]).await?;
    if !tx.is_success() {
        return Err(ScenarioError::TxFailed {
            code: tx.code,
            raw_log: tx.raw_log,
        });
    }

    let result = spin_result(&tx)?;
    tracing::info!(result, "roulette spun");
    Ok(result)
}

/// Runs every roulette test against an already deployed contract.
///
/// # Errors
///
/// Stops at the first failing test.
pub async fn run_tests<C: ChainClient>(env: &harness::TestEnv<C>) -> Result<(), ScenarioError> {
    run_test_function("test_bet_exact_number", || {
        test_bet_exact_number(&env.client, &env.contract)
    })
    .await?;
    Ok(())
}

/// Sets up two funded players, deploys the contract at `contract_path` and
/// runs every roulette test.
///
/// # Errors
///
/// Stops at the first failure.
pub async fn run(config: &NetworkConfig, contract_path: &Path) -> Result<(), ScenarioError> {
    let env = harness::initialize_and_upload_contract(config, contract_path, init_msg()).await?;
    run_tests(&env).await
}

#[cfg(test)]
mod tests {
    use sdk::Event;
    use sdk::mock::{Call, MockChain};
    use serde_json::json;

    use super::*;

    fn contract() -> ContractRef {
        ContractRef {
            code_hash: "hash".into(),
            address: "secret1roulette".into(),
        }
    }

    fn spun(attributes: &[(&str, &str)]) -> TxResponse {
        MockChain::tx_with_events(vec![
            Event::new("message", &[("action", "execute")]),
            Event::new(RESULT_EVENT, attributes),
        ])
    }

    #[test]
    fn init_msg_matches_contract_schema() {
        assert_eq!(
            init_msg(),
            json!({
                "min_bet": 5,
                "max_bet": 1000,
                "max_total": 1000000,
                "supported_denoms": ["uscrt"]
            })
        );
    }

    #[test]
    fn game_results_use_snake_case() {
        assert_eq!(
            serde_json::to_value(GameResult::Exact { num: 31 }).unwrap(),
            json!({"exact": {"num": 31}})
        );
        assert_eq!(
            serde_json::to_value(GameResult::Range2to1First).unwrap(),
            json!("range2to1_first")
        );
        assert_eq!(
            serde_json::to_value(GameResult::Line { nums: (1, 2) }).unwrap(),
            json!({"line": {"nums": [1, 2]}})
        );
    }

    #[tokio::test]
    async fn exact_bet_sends_stake_and_reads_result() {
        let chain = MockChain::new("secret1alice")
            .with_execute_response(spun(&[("contract_address", "secret1roulette"), ("result", "17")]));

        let result = test_bet_exact_number(&chain, &contract()).await.unwrap();
        assert_eq!(result, 17.0);

        match &chain.calls()[0] {
            Call::Execute { request, gas_limit } => {
                assert_eq!(*gas_limit, 200_000);
                assert_eq!(
                    request.msg,
                    json!({"bet": {"bets": [{
                        "amount": {"denom": "uscrt", "amount": "1000"},
                        "result": {"exact": {"num": 31}}
                    }]}})
                );
                assert_eq!(request.sent_funds, vec![sdk_core::Coin::new(1_000, "uscrt")]);
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_result_event_fails() {
        let chain = MockChain::new("secret1alice").with_execute_response(MockChain::tx_with_events(
            vec![Event::new("message", &[("action", "execute")])],
        ));
        assert!(matches!(
            test_bet_exact_number(&chain, &contract()).await,
            Err(ScenarioError::Assertion(_))
        ));
    }

    #[tokio::test]
    async fn rejected_bet_fails() {
        let chain = MockChain::new("secret1alice")
            .with_execute_response(MockChain::failed_tx(5, "bet exceeds max_bet"));
        match test_bet_exact_number(&chain, &contract()).await {
            Err(ScenarioError::TxFailed { code, raw_log }) => {
                assert_eq!(code, 5);
                assert_eq!(raw_log, "bet exceeds max_bet");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn spin_result_requires_a_finite_second_attribute() {
        assert_eq!(spin_result(&spun(&[("a", "x"), ("result", " 0 ")])).unwrap(), 0.0);
        assert!(spin_result(&spun(&[("result", "17")])).is_err());
        assert!(spin_result(&spun(&[("a", "x"), ("result", "red")])).is_err());
        assert!(spin_result(&spun(&[("a", "x"), ("result", "NaN")])).is_err());
        assert!(spin_result(&spun(&[("a", "x"), ("result", "inf")])).is_err());
    }
}
