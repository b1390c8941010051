//! Secret Network SDK for contract integration tests.
//!
//! The SDK drives the four stages of a test run:
//!
//! | Stage | Entry point |
//! |-------|-------------|
//! | Client initialization | [`SecretNetworkClient::new`] |
//! | Funding | [`faucet::fill_up_from_faucet`] |
//! | Deployment | [`deploy::initialize_contract`] |
//! | Scenarios | [`scenario::run_test_function`], [`events`] |
//!
//! Everything above the client is written against the [`ChainClient`]
//! trait, so deployment and funding logic can be tested without a node
//! (see the `mock` feature).
//!
//! # Usage
//!
//! ```no_run
//! use config::NetworkConfig;
//! use config::constants::FUNDING_TARGET;
//! use sdk::faucet::{Faucet, FillPolicy};
//! use sdk::{ChainClient, SecretNetworkClient};
//!
//! # async fn example(faucet: impl Faucet) -> Result<(), Box<dyn std::error::Error>> {
//! let config = NetworkConfig::from_env();
//! let client = SecretNetworkClient::new(&config)?;
//!
//! sdk::faucet::fill_up_from_faucet(&client, &faucet, FUNDING_TARGET, &FillPolicy::default())
//!     .await?;
//! let contract =
//!     sdk::deploy::initialize_contract(&client, "contract.wasm", serde_json::json!({})).await?;
//! println!("deployed at {}", contract.address);
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod client;
pub mod deploy;
pub mod error;
pub mod events;
pub mod faucet;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod retry;
pub mod scenario;
pub mod tx;
pub mod tx_response;

pub use chain::{ChainClient, ContractRef, ExecuteRequest, InstantiateRequest};
pub use client::SecretNetworkClient;
pub use error::SdkError;
pub use retry::RetryPolicy;
pub use tx_response::{Attribute, Event, TxLog, TxResponse};
