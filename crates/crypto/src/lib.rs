//! Cryptographic utilities for talking to Secret contracts.
//!
//! - [`encryption`] -- x25519 + HKDF + AES-SIV sealing of contract messages

pub mod encryption;

pub use encryption::{ContractCipher, EncryptionError, SealedMessage};
