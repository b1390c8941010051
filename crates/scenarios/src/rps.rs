//! Rock-paper-scissors contract scenarios.
//!
//! | Test | Checks |
//! |------|--------|
//! | `test_initialize_game` | `new_game` emits a non-empty `game_code` |
//! | `test_query_initial_status` | a fresh game waits for its second player |

use std::path::Path;

use config::NetworkConfig;
use config::constants::EXECUTE_GAS_LIMIT;
use sdk::events::{self, FromEvent};
use sdk::scenario::run_test_function;
use sdk::{ChainClient, ContractRef, Event, ExecuteRequest, SdkError, TxResponse};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ensure;
use crate::{ScenarioError, harness};

/// Event emitted when a game is created.
pub const NEW_GAME_EVENT: &str = "wasm-new_rps_game";

/// State of a game that has one player.
pub const WAITING_FOR_PLAYER: &str = "WaitingForPlayerToJoin";

/// Name the first player registers with.
pub const PLAYER_NAME: &str = "alice";

/// Init message of the contract.
pub fn init_msg() -> Value {
    json!({})
}

// ---------------------------------------------------------------------------
// Contract interface
// ---------------------------------------------------------------------------

/// The `wasm-new_rps_game` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRpsGame {
    pub game_code: String,
}

impl FromEvent for NewRpsGame {
    const EVENT_TYPE: &'static str = NEW_GAME_EVENT;

    fn from_event(event: &Event) -> Result<Self, SdkError> {
        let game_code = events::required_attribute(event, "game_code")?;
        Ok(Self {
            game_code: game_code.to_owned(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GameStateResponse {
    state: String,
}

/// Starts a new game as [`PLAYER_NAME`].
///
/// # Errors
///
/// Returns an error if the tx cannot be submitted. A rejected tx is
/// returned as-is.
pub async fn initialize_game(
    client: &impl ChainClient,
    contract: &ContractRef,
) -> Result<TxResponse, SdkError> {
    let msg = json!({"new_game": {"player_name": PLAYER_NAME}});
    let tx = client
        .execute_contract(ExecuteRequest::new(contract, msg), EXECUTE_GAS_LIMIT)
        .await?;
    tracing::info!(gas_used = tx.gas_used, code = tx.code, "new_game tx executed");
    Ok(tx)
}

/// Reads the state of `game_code`.
///
/// # Errors
///
/// Returns [`SdkError::QueryFailed`] if the contract rejects the query and
/// [`SdkError::InvalidPayload`] if the answer has no `state`.
pub async fn query_game_state(
    client: &impl ChainClient,
    contract: &ContractRef,
    game_code: &str,
) -> Result<String, SdkError> {
    let answer = client
        .query_contract(contract, &json!({"game_state": {"game": game_code}}))
        .await?;
    let response: GameStateResponse = serde_json::from_value(answer.clone())
        .map_err(|_| SdkError::InvalidPayload(format!("unexpected game state: {answer}")))?;
    Ok(response.state)
}

// ---------------------------------------------------------------------------
// Scenario tests
// ---------------------------------------------------------------------------

/// Creates a game and returns its code.
///
/// # Errors
///
/// Fails if the tx is rejected or carries no `game_code`.
pub async fn test_initialize_game(
    client: &impl ChainClient,
    contract: &ContractRef,
) -> Result<String, ScenarioError> {
    let tx = initialize_game(client, contract).await?;
    if !tx.is_success() {
        return Err(ScenarioError::TxFailed {
            code: tx.code,
            raw_log: tx.raw_log,
        });
    }

    let game_code = events::decode_event::<NewRpsGame>(&tx)
        .map(|event| event.game_code)
        .unwrap_or_default();
    tracing::info!(game_code = %game_code, "got game code");

    ensure(!game_code.is_empty(), || {
        format!(
            "Didn't get a new game code! This is the tx response: {}",
            tx.to_json()
        )
    })?;
    Ok(game_code)
}

/// Checks that a freshly created game waits for its second player.
///
/// # Errors
///
/// Fails if the query fails or the state differs.
pub async fn test_query_initial_status(
    client: &impl ChainClient,
    contract: &ContractRef,
    game_code: &str,
) -> Result<(), ScenarioError> {
    let state = query_game_state(client, contract, game_code).await?;
    ensure(state == WAITING_FOR_PLAYER, || {
        format!("Status was {state}, even though the game should be waiting for 2nd player")
    })
}

/// Runs every RPS test against an already deployed contract.
///
/// # Errors
///
/// Stops at the first failing test.
pub async fn run_tests<C: ChainClient>(env: &harness::TestEnv<C>) -> Result<(), ScenarioError> {
    let game_code = run_test_function("test_initialize_game", || {
        test_initialize_game(&env.client, &env.contract)
    })
    .await?;

    run_test_function("test_query_initial_status", || {
        test_query_initial_status(&env.client, &env.contract, &game_code)
    })
    .await
}

/// Sets up two funded players, deploys the contract at `contract_path` and
/// runs every RPS test.
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
    use sdk::mock::{Call, MockChain};

    use super::*;

    fn contract() -> ContractRef {
        ContractRef {
            code_hash: "hash".into(),
            address: "secret1contract".into(),
        }
    }

    #[tokio::test]
    async fn initialize_game_sends_new_game() {
        let chain = MockChain::new("secret1alice").with_execute_response(MockChain::tx_with_events(
            vec![Event::new(NEW_GAME_EVENT, &[("game_code", "QTEBERJH")])],
        ));

        let code = test_initialize_game(&chain, &contract()).await.unwrap();
        assert_eq!(code, "QTEBERJH");

        match &chain.calls()[0] {
            Call::Execute { request, gas_limit } => {
                assert_eq!(*gas_limit, 200_000);
                assert_eq!(request.msg, json!({"new_game": {"player_name": "alice"}}));
                assert!(request.sent_funds.is_empty());
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn event_lookup_ignores_case() {
        let chain = MockChain::new("secret1alice").with_execute_response(MockChain::tx_with_events(
            vec![Event::new("WASM-NEW_RPS_GAME", &[("Game_Code", "ABC")])],
        ));
        assert_eq!(test_initialize_game(&chain, &contract()).await.unwrap(), "ABC");
    }

    #[tokio::test]
    async fn missing_game_code_fails_with_tx_dump() {
        let chain = MockChain::new("secret1alice").with_execute_response(MockChain::tx_with_events(
            vec![Event::new("wasm", &[("contract_address", "secret1contract")])],
        ));

        match test_initialize_game(&chain, &contract()).await {
            Err(ScenarioError::Assertion(msg)) => {
                assert!(msg.starts_with("Didn't get a new game code!"));
                assert!(msg.contains("secret1contract"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_game_code_fails() {
        let chain = MockChain::new("secret1alice").with_execute_response(MockChain::tx_with_events(
            vec![Event::new(NEW_GAME_EVENT, &[("game_code", "")])],
        ));
        assert!(matches!(
            test_initialize_game(&chain, &contract()).await,
            Err(ScenarioError::Assertion(_))
        ));
    }

    #[tokio::test]
    async fn rejected_new_game_is_tx_failure() {
        let chain = MockChain::new("secret1alice")
            .with_execute_response(MockChain::failed_tx(11, "out of gas"));
        assert!(matches!(
            test_initialize_game(&chain, &contract()).await,
            Err(ScenarioError::TxFailed { code: 11, .. })
        ));
    }

    #[tokio::test]
    async fn initial_status_waits_for_player() {
        let chain = MockChain::new("secret1alice")
            .with_query_response(json!({"state": "WaitingForPlayerToJoin"}));

        test_query_initial_status(&chain, &contract(), "QTEB")
            .await
            .unwrap();
        match &chain.calls()[0] {
            Call::Query { query, .. } => {
                assert_eq!(*query, json!({"game_state": {"game": "QTEB"}}));
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_status_is_assertion_failure() {
        let chain =
            MockChain::new("secret1alice").with_query_response(json!({"state": "Finished"}));

        match test_query_initial_status(&chain, &contract(), "QTEB").await {
            Err(ScenarioError::Assertion(msg)) => assert!(msg.contains("Status was Finished")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn contract_error_answer_is_not_a_state() {
        let chain =
            MockChain::new("secret1alice").with_query_response(json!({"err": "unknown game"}));
        assert!(matches!(
            test_query_initial_status(&chain, &contract(), "QTEB").await,
            Err(ScenarioError::Sdk(SdkError::InvalidPayload(_)))
        ));
    }

    #[tokio::test]
    async fn full_run_against_mock() {
        let chain = MockChain::new("secret1alice")
            .with_execute_response(MockChain::tx_with_events(vec![Event::new(
                NEW_GAME_EVENT,
                &[("game_code", "G1")],
            )]))
            .with_query_response(json!({"state": WAITING_FOR_PLAYER}));
        let env = harness::TestEnv {
            client: chain,
            client2: MockChain::new("secret1bob"),
            contract: contract(),
        };

        run_tests(&env).await.unwrap();
    }
}
