//! Harness constants.
//!
//! Gas limits match what the contracts under test need on a `localsecret`
//! node. They are fixed budgets, not estimates.

/// Native fee and staking denomination.
pub const NATIVE_DENOM: &str = "uscrt";

/// Fee per unit of gas in thousandths of a `uscrt` (0.1 uscrt).
pub const DEFAULT_GAS_PRICE_MILLI: u64 = 100;

/// Gas limit for a `MsgStoreCode` upload.
pub const UPLOAD_GAS_LIMIT: u64 = 5_000_000;

/// Gas limit for a `MsgInstantiateContract`.
pub const INSTANTIATE_GAS_LIMIT: u64 = 1_000_000;

/// Gas limit for a scenario `MsgExecuteContract`.
pub const EXECUTE_GAS_LIMIT: u64 = 200_000;

/// Balance every test account is funded to before deploying.
pub const FUNDING_TARGET: u128 = 100_000_000;

/// Path appended to the faucet base URL.
pub const FAUCET_PATH: &str = "/faucet";

/// Prefix of generated instantiate labels.
pub const LABEL_PREFIX: &str = "My contract";

/// Upper bound (inclusive) of the random label suffix.
pub const LABEL_SUFFIX_MAX: u32 = 10_000;

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Delay between tx inclusion polls in milliseconds.
pub const TX_POLL_INTERVAL_MS: u64 = 1_000;

/// Deadline for a broadcast tx to land in a block, in milliseconds.
pub const TX_INCLUSION_TIMEOUT_MS: u64 = 60_000;
