//! Shared setup: two funded players and one deployed contract.

use std::path::Path;

use config::NetworkConfig;
use config::constants::FUNDING_TARGET;
use funding_client::FundingClient;
use sdk::deploy::{self, DeployOptions};
use sdk::faucet::{self, Faucet, FillPolicy};
use sdk::{ChainClient, ContractRef, SecretNetworkClient};
use serde_json::Value;

use crate::ScenarioError;

/// Everything a scenario needs: two players and the contract under test.
///
/// `client` deployed the contract; `client2` is the second player.
#[derive(Debug)]
pub struct TestEnv<C> {
    pub client: C,
    pub client2: C,
    pub contract: ContractRef,
}

/// Funds both players to [`FUNDING_TARGET`] and deploys `wasm` from
/// `client`.
///
/// # Errors
///
/// Any funding or deployment failure aborts the run.
pub async fn prepare<C: ChainClient>(
    client: C,
    client2: C,
    faucet: &impl Faucet,
    policy: &FillPolicy,
    wasm: Vec<u8>,
    init_msg: Value,
) -> Result<TestEnv<C>, ScenarioError> {
    for player in [&client, &client2] {
        faucet::fill_up_from_faucet(player, faucet, FUNDING_TARGET, policy).await?;
    }

    let contract =
        deploy::initialize_contract_with(&client, wasm, init_msg, &DeployOptions::default())
            .await?;

    Ok(TestEnv {
        client,
        client2,
        contract,
    })
}

/// Creates two fresh clients for `config`, funds them from its faucet and
/// deploys the contract at `contract_path`.
///
/// # Errors
///
/// Any construction, funding or deployment failure aborts the run.
pub async fn initialize_and_upload_contract(
    config: &NetworkConfig,
    contract_path: &Path,
    init_msg: Value,
) -> Result<TestEnv<SecretNetworkClient>, ScenarioError> {
    let client = SecretNetworkClient::new(config)?;
    let client2 = SecretNetworkClient::new(config)?;
    let faucet = FundingClient::from_config(config);
    let wasm = deploy::read_contract(contract_path).await?;

    prepare(
        client,
        client2,
        &faucet,
        &FillPolicy::default(),
        wasm,
        init_msg,
    )
    .await
}

#[cfg(test)]
pub(crate) mod tests {
    use std::error::Error;
    use std::sync::Arc;

    use sdk::Event;
    use sdk::mock::{Call, MockChain};
    use serde_json::json;

    use super::*;

    /// Pays `FUNDING_TARGET` to whichever mock chain owns the address.
    pub(crate) struct MockFaucet {
        pub(crate) chains: Vec<Arc<MockChain>>,
    }

    impl Faucet for MockFaucet {
        async fn request_funds(&self, address: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
            let chain = self
                .chains
                .iter()
                .find(|c| c.address() == address)
                .ok_or("unknown address")?;
            chain.credit(FUNDING_TARGET);
            Ok(())
        }
    }

    pub(crate) fn deployable(address: &str) -> MockChain {
        MockChain::new(address)
            .with_store_response(MockChain::tx_with_events(vec![Event::new(
                "message",
                &[("code_id", "1")],
            )]))
            .with_code_hash(1, "hash")
            .with_instantiate_response(MockChain::tx_with_events(vec![Event::new(
                "message",
                &[("contract_address", "secret1contract")],
            )]))
    }

    #[tokio::test]
    async fn funds_both_players_then_deploys_from_first() {
        let a = Arc::new(deployable("secret1alice"));
        let b = Arc::new(MockChain::new("secret1bob"));
        let faucet = MockFaucet {
            chains: vec![Arc::clone(&a), Arc::clone(&b)],
        };

        let env = prepare(
            Arc::clone(&a),
            Arc::clone(&b),
            &faucet,
            &FillPolicy::unbounded(),
            vec![0],
            json!({}),
        )
        .await
        .unwrap();

        assert_eq!(env.contract.address, "secret1contract");
        assert_eq!(a.current_balance(), FUNDING_TARGET);
        assert_eq!(b.current_balance(), FUNDING_TARGET);
        assert!(
            b.calls()
                .iter()
                .all(|c| matches!(c, Call::Balance { .. }))
        );
    }

    #[tokio::test]
    async fn deploy_failure_aborts_setup() {
        let a = Arc::new(MockChain::new("secret1alice").with_balance(FUNDING_TARGET));
        let b = Arc::new(MockChain::new("secret1bob").with_balance(FUNDING_TARGET));
        let faucet = MockFaucet { chains: vec![] };

        let err = prepare(a, b, &faucet, &FillPolicy::unbounded(), vec![0], json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ScenarioError::Deploy(_)));
    }
}
