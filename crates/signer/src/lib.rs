//! Signing abstractions for Secret Network transactions.
//!
//! This crate provides:
//!
//! - [`Signer`] trait -- compressed public key + `SIGN_MODE_DIRECT` signing
//! - [`ecdsa`] module -- sign/verify primitives over secp256k1
//! - [`Wallet`] -- BIP39/BIP44 HD wallet implementing [`Signer`]
//!
//! The SDK only talks to the [`Signer`] trait, so tests and alternative key
//! backends can plug in without touching transaction assembly.

pub mod ecdsa;
pub mod wallet;

pub use wallet::{Wallet, WalletError, account_id};

/// Compressed secp256k1 public key (33 bytes, `0x02`/`0x03` prefix).
pub type PubKey = [u8; 33];

/// Signing capability for Cosmos transactions.
pub trait Signer: Send + Sync {
    /// Returns the compressed secp256k1 public key.
    fn public_key(&self) -> PubKey;

    /// Sign protobuf-encoded `SignDoc` bytes.
    ///
    /// The implementation should:
    /// 1. SHA256-hash `sign_doc`
    /// 2. ECDSA-sign the 32-byte digest (low-S)
    /// 3. Return the 64-byte compact signature
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails (e.g. remote signer unavailable).
    fn sign_direct(
        &self,
        sign_doc: &[u8],
    ) -> Result<[u8; 64], Box<dyn std::error::Error + Send + Sync>>;
}
