//! SDK error types.
//!
//! [`SdkError`] is the unified error type for chain client operations.
//! Failures that reach the chain as a transaction (non-zero code) are *not*
//! errors at this layer: they come back as a [`TxResponse`](crate::TxResponse)
//! so callers can attach the raw log to their own error.

use std::fmt;

use secret_crypto::EncryptionError;
use signer::WalletError;
use transport::LcdError;

// ---------------------------------------------------------------------------
// SdkError
// ---------------------------------------------------------------------------

/// Errors from SDK operations.
#[derive(Debug)]
pub enum SdkError {
    /// The wallet could not be generated or restored.
    Wallet(WalletError),

    /// An LCD call failed (connection, HTTP status, or malformed body).
    Transport(LcdError),

    /// The signer failed to produce a signature.
    SigningFailed(String),

    /// The sender has no on-chain account yet (never funded).
    AccountNotFound(String),

    /// A broadcast tx was not included before the deadline.
    TxTimeout { tx_hash: String },

    /// Contract message encryption or decryption failed.
    Encryption(EncryptionError),

    /// A smart query was rejected by the contract.
    QueryFailed(String),

    /// A request or response payload was malformed.
    InvalidPayload(String),

    /// An expected event attribute was not present in the tx log.
    MissingField { event: String, key: String },
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wallet(e) => write!(f, "wallet error: {e}"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::SigningFailed(e) => write!(f, "signing failed: {e}"),
            Self::AccountNotFound(address) => write!(f, "account {address} not found on chain"),
            Self::TxTimeout { tx_hash } => {
                write!(f, "tx {tx_hash} was not included before the deadline")
            }
            Self::Encryption(e) => write!(f, "{e}"),
            Self::QueryFailed(e) => write!(f, "contract query failed: {e}"),
            Self::InvalidPayload(e) => write!(f, "invalid payload: {e}"),
            Self::MissingField { event, key } => {
                write!(f, "attribute `{key}` not found on event `{event}`")
            }
        }
    }
}

impl std::error::Error for SdkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wallet(e) => Some(e),
            Self::Transport(e) => Some(e),
            Self::Encryption(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LcdError> for SdkError {
    fn from(e: LcdError) -> Self {
        Self::Transport(e)
    }
}

impl From<WalletError> for SdkError {
    fn from(e: WalletError) -> Self {
        Self::Wallet(e)
    }
}

impl From<EncryptionError> for SdkError {
    fn from(e: EncryptionError) -> Self {
        Self::Encryption(e)
    }
}

impl SdkError {
    /// Returns `true` if this error is transient and may succeed on retry.
    ///
    /// Only transport failures and inclusion timeouts qualify; everything
    /// else (bad payloads, missing fields, contract rejections) is persistent.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::TxTimeout { .. })
    }
}
