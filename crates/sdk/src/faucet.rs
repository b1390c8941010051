//! Funding test accounts from a faucet.
//!
//! [`fill_up_from_faucet`] polls the account balance and asks the faucet for
//! more until the balance reaches a threshold:
//!
//! ```text
//!  Polling --(balance >= threshold)--> Funded
//!     |  ^
//!     |  | faucet request (failures logged and counted)
//!     +--+
//! ```
//!
//! The loop is bounded by a [`FillPolicy`]. Running out of requests or time
//! ends with [`FaucetError::TimedOut`]; a failing balance query ends it
//! immediately.

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use config::constants::NATIVE_DENOM;
use tokio::time::Instant;

use crate::chain::ChainClient;
use crate::retry::RetryPolicy;
use crate::SdkError;

// ---------------------------------------------------------------------------
// Faucet trait
// ---------------------------------------------------------------------------

/// A source of test funds.
///
/// Only success or failure of a request matters; the payout is observed
/// through the balance.
pub trait Faucet: Send + Sync {
    /// Asks the faucet to send funds to `address`.
    fn request_funds(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<(), Box<dyn Error + Send + Sync>>> + Send;
}

// ---------------------------------------------------------------------------
// Policy / report
// ---------------------------------------------------------------------------

/// Limits on a fill loop.
#[derive(Debug, Clone, PartialEq)]
pub struct FillPolicy {
    /// Give up after this many faucet requests. `None` means no cap.
    pub max_requests: Option<u32>,
    /// Give up after this much wall time. `None` means no deadline.
    pub timeout: Option<Duration>,
    /// Delay schedule between a faucet request and the next balance poll.
    pub backoff: RetryPolicy,
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self {
            max_requests: Some(20),
            timeout: Some(Duration::from_secs(120)),
            backoff: RetryPolicy::default(),
        }
    }
}

impl FillPolicy {
    /// Poll and request forever, back to back.
    pub fn unbounded() -> Self {
        Self {
            max_requests: None,
            timeout: None,
            backoff: RetryPolicy::immediate(),
        }
    }
}

/// Outcome of a successful fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    /// Balance observed when the threshold was met.
    pub balance: u128,
    /// Faucet requests made, including failed ones.
    pub requests: u32,
    pub failed_requests: u32,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from [`fill_up_from_faucet`].
#[derive(Debug)]
pub enum FaucetError {
    /// The balance query failed.
    Sdk(SdkError),

    /// The policy ran out before the balance reached the threshold.
    TimedOut {
        requests: u32,
        failed_requests: u32,
        last_balance: u128,
    },
}

impl fmt::Display for FaucetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sdk(e) => write!(f, "{e}"),
            Self::TimedOut {
                requests,
                failed_requests,
                last_balance,
            } => write!(
                f,
                "account not funded after {requests} faucet requests \
                 ({failed_requests} failed), balance {last_balance}"
            ),
        }
    }
}

impl std::error::Error for FaucetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sdk(e) => Some(e),
            Self::TimedOut { .. } => None,
        }
    }
}

impl From<SdkError> for FaucetError {
    fn from(e: SdkError) -> Self {
        Self::Sdk(e)
    }
}

// ---------------------------------------------------------------------------
// Fill loop
// ---------------------------------------------------------------------------

/// Requests funds until the client's `uscrt` balance is at least `threshold`.
///
/// # Errors
///
/// Returns [`FaucetError::Sdk`] if a balance query fails and
/// [`FaucetError::TimedOut`] when `policy` is exhausted.
pub async fn fill_up_from_faucet(
    client: &impl ChainClient,
    faucet: &impl Faucet,
    threshold: u128,
    policy: &FillPolicy,
) -> Result<FillReport, FaucetError> {
    let address = client.address();
    let deadline = policy.timeout.map(|t| Instant::now() + t);
    let mut requests = 0u32;
    let mut failed_requests = 0u32;

    loop {
        let balance = client.balance(NATIVE_DENOM).await?;
        if balance >= threshold {
            tracing::info!(address, balance, requests, failed_requests, "account funded");
            return Ok(FillReport {
                balance,
                requests,
                failed_requests,
            });
        }

        let out_of_requests = policy.max_requests.is_some_and(|max| requests >= max);
        let out_of_time = deadline.is_some_and(|d| Instant::now() >= d);
        if out_of_requests || out_of_time {
            tracing::warn!(
                address,
                balance,
                threshold,
                requests,
                failed_requests,
                "giving up on faucet"
            );
            return Err(FaucetError::TimedOut {
                requests,
                failed_requests,
                last_balance: balance,
            });
        }

        tracing::debug!(address, balance, threshold, "requesting funds from faucet");
        let outcome = match deadline {
            Some(d) => tokio::time::timeout_at(d, faucet.request_funds(address))
                .await
                .unwrap_or_else(|_| Err("faucet request exceeded the fill deadline".into())),
            None => faucet.request_funds(address).await,
        };
        if let Err(e) = outcome {
            failed_requests += 1;
            tracing::warn!(address, error = %e, "faucet request failed");
        }

        let mut delay = policy.backoff.backoff_for(requests);
        requests += 1;
        if let Some(d) = deadline {
            delay = delay.min(d.saturating_duration_since(Instant::now()));
        }
        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "waiting for faucet payout");
            tokio::time::sleep(delay).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
