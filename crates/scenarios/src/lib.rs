//! Integration scenarios for Secret Network contracts.
//!
//! Each contract module exposes its messages, the individual checks and a
//! `run` entry point that prepares a [`harness::TestEnv`] against a live
//! node:
//!
//! | Module | Contract | Checks |
//! |--------|----------|--------|
//! | [`rps`] | rock-paper-scissors | game creation, initial game state |
//! | [`roulette`] | roulette | exact-number bet reports a spin |
//!
//! The checks are generic over [`sdk::ChainClient`], so they run against
//! [`sdk::SecretNetworkClient`] on a node or a mock in unit tests.

pub mod error;
pub mod harness;
pub mod roulette;
pub mod rps;

pub use error::ScenarioError;
