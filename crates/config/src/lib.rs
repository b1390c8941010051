//! Secret Network harness configuration.
//!
//! This crate provides the per-run configuration for the integration harness:
//!
//! - [`NetworkConfig`] -- LCD endpoint, chain id, faucet URL and tx polling
//! - [`constants`] -- gas limits, denominations and funding targets
//!
//! Values come from environment variables with hard-coded fallbacks that
//! point at a local `localsecret` node:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `SECRET_LCD_URL` | `http://localhost:1317` |
//! | `SECRET_CHAIN_ID` | `secretdev-1` |
//! | `SECRET_FAUCET_URL` | `http://localhost:5000` |
//! | `CONTRACT_PATH` | `contract.wasm` |
//!
//! `config` does **not** depend on transport, crypto, or any runtime crate,
//! so it can be used freely as a leaf dependency.

pub mod constants;

use std::path::PathBuf;
use std::time::Duration;

use constants::{
    DEFAULT_GAS_PRICE_MILLI, DEFAULT_REQUEST_TIMEOUT_MS, NATIVE_DENOM, TX_INCLUSION_TIMEOUT_MS,
    TX_POLL_INTERVAL_MS,
};

/// Environment variable holding the LCD (REST) endpoint.
pub const ENV_LCD_URL: &str = "SECRET_LCD_URL";

/// Environment variable holding the chain identifier.
pub const ENV_CHAIN_ID: &str = "SECRET_CHAIN_ID";

/// Environment variable holding the faucet base URL.
pub const ENV_FAUCET_URL: &str = "SECRET_FAUCET_URL";

/// Environment variable holding the path to the compiled contract.
pub const ENV_CONTRACT_PATH: &str = "CONTRACT_PATH";

/// LCD endpoint of a local `localsecret` node.
pub const LOCAL_LCD_URL: &str = "http://localhost:1317";

/// Chain id of a local `localsecret` node.
pub const LOCAL_CHAIN_ID: &str = "secretdev-1";

/// Faucet exposed by the `localsecret` docker image.
pub const LOCAL_FAUCET_URL: &str = "http://localhost:5000";

/// Relative path of the compiled contract binary.
pub const DEFAULT_CONTRACT_PATH: &str = "contract.wasm";

// ---------------------------------------------------------------------------
// NetworkConfig
// ---------------------------------------------------------------------------

/// Endpoint and chain configuration shared by every client in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    /// Base URL of the LCD REST gateway.
    pub lcd_url: String,

    /// Chain identifier signed into every transaction.
    pub chain_id: String,

    /// Base URL of the faucet service.
    pub faucet_url: String,

    /// Denomination used for fees and balance checks.
    pub denom: &'static str,

    /// Fee paid per unit of gas, in thousandths of `denom` (100 = 0.1).
    pub gas_price_milli: u64,

    /// Per-request HTTP timeout.
    pub request_timeout: Duration,

    /// Delay between polls while waiting for a tx to land in a block.
    pub tx_poll_interval: Duration,

    /// Upper bound on waiting for a broadcast tx to be included.
    pub tx_inclusion_timeout: Duration,
}

impl NetworkConfig {
    /// Configuration for a local `localsecret` node with default timings.
    pub fn localsecret() -> Self {
        Self {
            lcd_url: LOCAL_LCD_URL.to_owned(),
            chain_id: LOCAL_CHAIN_ID.to_owned(),
            faucet_url: LOCAL_FAUCET_URL.to_owned(),
            denom: NATIVE_DENOM,
            gas_price_milli: DEFAULT_GAS_PRICE_MILLI,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            tx_poll_interval: Duration::from_millis(TX_POLL_INTERVAL_MS),
            tx_inclusion_timeout: Duration::from_millis(TX_INCLUSION_TIMEOUT_MS),
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// Unset or empty variables fall back to the `localsecret` defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::localsecret();
        if let Some(url) = read(ENV_LCD_URL) {
            config.lcd_url = url;
        }
        if let Some(chain_id) = read(ENV_CHAIN_ID) {
            config.chain_id = chain_id;
        }
        if let Some(url) = read(ENV_FAUCET_URL) {
            config.faucet_url = url;
        }
        config
    }

    /// Overrides the LCD endpoint.
    pub fn with_lcd_url(mut self, url: impl Into<String>) -> Self {
        self.lcd_url = url.into();
        self
    }

    /// Overrides the faucet base URL.
    pub fn with_faucet_url(mut self, url: impl Into<String>) -> Self {
        self.faucet_url = url.into();
        self
    }

    /// Overrides the tx polling cadence and deadline.
    pub fn with_tx_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.tx_poll_interval = interval;
        self.tx_inclusion_timeout = timeout;
        self
    }

    /// Fee amount for a given gas limit, rounded up to a whole `denom` unit.
    pub fn fee_for_gas(&self, gas_limit: u64) -> u128 {
        (gas_limit as u128 * self.gas_price_milli as u128).div_ceil(1_000)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::localsecret()
    }
}

/// Path of the contract binary, from `CONTRACT_PATH` or `contract.wasm`.
pub fn contract_path_from_env() -> PathBuf {
    std::env::var(ENV_CONTRACT_PATH)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTRACT_PATH))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn localsecret_defaults() {
        let config = NetworkConfig::localsecret();
        assert_eq!(config.lcd_url, "http://localhost:1317");
        assert_eq!(config.chain_id, "secretdev-1");
        assert_eq!(config.faucet_url, "http://localhost:5000");
        assert_eq!(config.denom, "uscrt");
    }

    #[test]
    fn lookup_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            (ENV_LCD_URL, "http://node:1317"),
            (ENV_CHAIN_ID, "pulsar-3"),
        ]
        .into_iter()
        .collect();

        let config = NetworkConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.lcd_url, "http://node:1317");
        assert_eq!(config.chain_id, "pulsar-3");
        assert_eq!(config.faucet_url, LOCAL_FAUCET_URL);
    }

    #[test]
    fn blank_values_fall_back() {
        let config = NetworkConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, NetworkConfig::localsecret());
    }

    #[test]
    fn fee_rounds_up() {
        let config = NetworkConfig::localsecret();
        assert_eq!(config.fee_for_gas(5_000_000), 500_000);
        assert_eq!(config.fee_for_gas(200_001), 20_001);
        assert_eq!(config.fee_for_gas(0), 0);
    }

    #[test]
    fn builder_overrides() {
        let config = NetworkConfig::localsecret()
            .with_lcd_url("http://127.0.0.1:9999")
            .with_tx_polling(Duration::from_millis(5), Duration::from_millis(50));
        assert_eq!(config.lcd_url, "http://127.0.0.1:9999");
        assert_eq!(config.tx_poll_interval, Duration::from_millis(5));
        assert_eq!(config.tx_inclusion_timeout, Duration::from_millis(50));
    }
}
