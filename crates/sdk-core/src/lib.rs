//! Core types shared across the Secret Network harness.
//!
//! - [`SecretAddress`] -- bech32-encoded account or contract address
//! - [`Coin`] -- an amount of a single denomination

pub mod secret_address;

use std::fmt;
use std::str::FromStr;

pub use secret_address::{SecretAddress, SecretAddressError};

// ---------------------------------------------------------------------------
// Coin
// ---------------------------------------------------------------------------

/// An amount of a single denomination, e.g. `1000uscrt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Error returned when a `<amount><denom>` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCoinError(pub String);

impl fmt::Display for ParseCoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid coin: {}", self.0)
    }
}

impl std::error::Error for ParseCoinError {}

impl FromStr for Coin {
    type Err = ParseCoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| ParseCoinError(s.to_string()))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() || denom.is_empty() {
            return Err(ParseCoinError(s.to_string()));
        }
        let amount = amount
            .parse::<u128>()
            .map_err(|_| ParseCoinError(s.to_string()))?;
        Ok(Self::new(amount, denom))
    }
}
