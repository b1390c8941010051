//! Secret Network address encoding and decoding.
//!
//! Secret addresses are Bech32 (not Bech32m) strings with the `secret` HRP.
//! The payload is the raw account id:
//!
//! | Kind | Payload |
//! |------|---------|
//! | Account | `ripemd160(sha256(compressed_pubkey))`, 20 bytes |
//! | Contract | 20 or 32 bytes assigned by the compute module |
//!
//! Hashing the public key is the signer's job; this module only deals with
//! the bech32 envelope so it stays free of crypto dependencies.
//!
//! # Example
//!
//! ```rust
//! use sdk_core::SecretAddress;
//!
//! let address = SecretAddress::from_account_id([0u8; 20]);
//! let parsed: SecretAddress = address.to_string().parse().unwrap();
//! assert_eq!(parsed, address);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Human-readable part of every Secret Network address.
pub const HRP_SECRET: &str = "secret";

const HRP: Hrp = Hrp::parse_unchecked(HRP_SECRET);

/// Length of an account id derived from a public key.
pub const ACCOUNT_ID_LEN: usize = 20;

/// Longest payload accepted when parsing (module/contract addresses).
pub const MAX_ADDRESS_LEN: usize = 32;

// ---------------------------------------------------------------------------
// SecretAddress
// ---------------------------------------------------------------------------

/// A decoded `secret1...` address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretAddress {
    bytes: Vec<u8>,
}

impl SecretAddress {
    /// Wraps a 20-byte account id.
    pub fn from_account_id(account_id: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self {
            bytes: account_id.to_vec(),
        }
    }

    /// Raw address bytes, as carried in protobuf `sender`/`contract` fields.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encodes this address as a Bech32 string.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parses a Secret address from a Bech32 string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The string is not valid Bech32
    /// - The HRP is not `secret`
    /// - The payload is empty or longer than [`MAX_ADDRESS_LEN`]
    pub fn parse(s: &str) -> Result<Self, SecretAddressError> {
        let normalized: Cow<'_, str> = if s.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(s.to_lowercase())
        } else {
            Cow::Borrowed(s)
        };

        let checked = CheckedHrpstring::new::<Bech32>(&normalized)
            .map_err(|e| SecretAddressError::Bech32(e.to_string()))?;

        let hrp = checked.hrp();
        if hrp.as_str() != HRP_SECRET {
            return Err(SecretAddressError::WrongPrefix(hrp.to_string()));
        }

        let bytes: Vec<u8> = checked.byte_iter().collect();
        if bytes.is_empty() || bytes.len() > MAX_ADDRESS_LEN {
            return Err(SecretAddressError::BadLength(bytes.len()));
        }

        Ok(Self { bytes })
    }
}

impl fmt::Display for SecretAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bech32::encode_lower_to_fmt::<Bech32, _>(f, HRP, &self.bytes).map_err(|_| fmt::Error)
    }
}

impl FromStr for SecretAddress {
    type Err = SecretAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors that can occur when parsing Secret addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretAddressError {
    /// Bech32 decoding failed.
    Bech32(String),

    /// The HRP is not `secret`.
    WrongPrefix(String),

    /// The payload length is not a valid address length.
    BadLength(usize),
}

impl fmt::Display for SecretAddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bech32(e) => write!(f, "bech32 error: {e}"),
            Self::WrongPrefix(hrp) => write!(f, "expected `secret` prefix, got `{hrp}`"),
            Self::BadLength(len) => write!(f, "invalid address length: {len} bytes"),
        }
    }
}

impl std::error::Error for SecretAddressError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential_id() -> [u8; 20] {
        let mut id = [0u8; 20];
        for (i, b) in id.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        id
    }

    #[test]
    fn encodes_known_vector() {
        let address = SecretAddress::from_account_id(sequential_id());
        assert_eq!(
            address.encode(),
            "secret1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5a8chmq"
        );
    }

    #[test]
    fn parses_known_vector() {
        let parsed = SecretAddress::parse("secret1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5a8chmq").unwrap();
        assert_eq!(parsed.as_bytes(), &sequential_id());
    }

    #[test]
    fn uppercase_input_accepted() {
        let address = SecretAddress::from_account_id([0u8; 20]);
        let upper = address.encode().to_uppercase();
        assert_eq!(SecretAddress::parse(&upper).unwrap(), address);
    }

    #[test]
    fn other_chain_prefix_rejected() {
        let result = SecretAddress::parse("cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu");
        assert_eq!(
            result,
            Err(SecretAddressError::WrongPrefix("cosmos".to_string()))
        );
    }

    #[test]
    fn bad_checksum_rejected() {
        let result = SecretAddress::parse("secret1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5a8chmp");
        assert!(matches!(result, Err(SecretAddressError::Bech32(_))));
    }

    #[test]
    fn from_str_trait() {
        let address = SecretAddress::from_account_id([7u8; 20]);
        let parsed: SecretAddress = address.encode().parse().unwrap();
        assert_eq!(parsed, address);
    }
}
