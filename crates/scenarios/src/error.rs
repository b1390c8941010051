//! Scenario error type.

use std::fmt;

use sdk::SdkError;
use sdk::deploy::DeployError;
use sdk::faucet::FaucetError;

/// Errors that abort a scenario run.
#[derive(Debug)]
pub enum ScenarioError {
    /// A chain call failed.
    Sdk(SdkError),

    /// The contract could not be deployed.
    Deploy(DeployError),

    /// A test account could not be funded.
    Faucet(FaucetError),

    /// A scenario transaction was rejected by the chain.
    TxFailed { code: u32, raw_log: String },

    /// The contract behaved differently than the scenario expects.
    Assertion(String),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sdk(e) => write!(f, "{e}"),
            Self::Deploy(e) => write!(f, "deployment failed: {e}"),
            Self::Faucet(e) => write!(f, "funding failed: {e}"),
            Self::TxFailed { code, raw_log } => write!(f, "tx failed with code {code}: {raw_log}"),
            Self::Assertion(msg) => write!(f, "assertion failed: {msg}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sdk(e) => Some(e),
            Self::Deploy(e) => Some(e),
            Self::Faucet(e) => Some(e),
            Self::TxFailed { .. } | Self::Assertion(_) => None,
        }
    }
}

impl From<SdkError> for ScenarioError {
    fn from(e: SdkError) -> Self {
        Self::Sdk(e)
    }
}

impl From<DeployError> for ScenarioError {
    fn from(e: DeployError) -> Self {
        Self::Deploy(e)
    }
}

impl From<FaucetError> for ScenarioError {
    fn from(e: FaucetError) -> Self {
        Self::Faucet(e)
    }
}

/// Fails with [`ScenarioError::Assertion`] unless `condition` holds.
pub(crate) fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), ScenarioError> {
    if condition {
        Ok(())
    } else {
        Err(ScenarioError::Assertion(message()))
    }
}
