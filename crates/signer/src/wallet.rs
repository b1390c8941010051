//! HD wallet for Secret Network accounts.
//!
//! [`Wallet`] is built from a BIP39 mnemonic. It derives the account key at
//! the Cosmos BIP44 path for coin type 529 (`m/44'/529'/0'/0/0`) once, at
//! construction time, and caches the compressed public key and address.

use std::fmt;

use bip39::Mnemonic;
use bitcoin::NetworkKind;
use bitcoin::bip32::{ChildNumber, Xpriv};
use bitcoin::hashes::{Hash, hash160};
use bitcoin::secp256k1::{All, PublicKey, Secp256k1, SecretKey};
use rand_core::{CryptoRng, RngCore};
use sdk_core::SecretAddress;

use crate::{PubKey, Signer, ecdsa};

/// SLIP-44 coin type registered for Secret Network.
pub const SECRET_COIN_TYPE: u32 = 529;

/// Entropy for a 12-word mnemonic.
const MNEMONIC_ENTROPY_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from wallet construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The phrase is not a valid BIP39 English mnemonic.
    InvalidMnemonic(String),
    /// BIP32 key derivation failed (invalid seed or path).
    KeyDerivationFailed,
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMnemonic(e) => write!(f, "invalid mnemonic: {e}"),
            Self::KeyDerivationFailed => write!(f, "key derivation failed"),
        }
    }
}

impl std::error::Error for WalletError {}

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

/// A single-account secp256k1 wallet.
///
/// Holds:
/// - A `Secp256k1<All>` context for signing and verification.
/// - The mnemonic it was derived from, so test runs can be reproduced.
/// - The account key at `m/44'/529'/0'/0/0` and its bech32 address.
pub struct Wallet {
    secp: Secp256k1<All>,
    mnemonic: Mnemonic,
    secret_key: SecretKey,
    public_key: PubKey,
    address: SecretAddress,
}

impl Wallet {
    /// Generates a wallet from a fresh random 12-word mnemonic.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::KeyDerivationFailed`] if the derived key is
    /// invalid, which has negligible probability.
    pub fn generate(rng: &mut (impl CryptoRng + RngCore)) -> Result<Self, WalletError> {
        let mut entropy = [0u8; MNEMONIC_ENTROPY_LEN];
        rng.fill_bytes(&mut entropy);
        let mnemonic = Mnemonic::from_entropy(&entropy)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
        Self::from_mnemonic(mnemonic)
    }

    /// Restores a wallet from a mnemonic phrase.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidMnemonic`] if the phrase does not parse.
    pub fn from_phrase(phrase: &str) -> Result<Self, WalletError> {
        let mnemonic =
            Mnemonic::parse(phrase).map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
        Self::from_mnemonic(mnemonic)
    }

    fn from_mnemonic(mnemonic: Mnemonic) -> Result<Self, WalletError> {
        let secp = Secp256k1::new();
        let seed = mnemonic.to_seed("");

        let master = Xpriv::new_master(NetworkKind::Main, &seed)
            .map_err(|_| WalletError::KeyDerivationFailed)?;

        // m/44'/529'/0'/0/0
        let path = [
            ChildNumber::Hardened { index: 44 },
            ChildNumber::Hardened {
                index: SECRET_COIN_TYPE,
            },
            ChildNumber::Hardened { index: 0 },
            ChildNumber::Normal { index: 0 },
            ChildNumber::Normal { index: 0 },
        ];
        let account = master
            .derive_priv(&secp, &path)
            .map_err(|_| WalletError::KeyDerivationFailed)?;

        let secret_key = account.private_key;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key).serialize();
        let address = SecretAddress::from_account_id(account_id(&public_key));

        Ok(Self {
            secp,
            mnemonic,
            secret_key,
            public_key,
            address,
        })
    }

    /// The bech32 `secret1...` address of this account.
    pub fn address(&self) -> &SecretAddress {
        &self.address
    }

    /// The mnemonic phrase this wallet was derived from.
    pub fn mnemonic(&self) -> String {
        self.mnemonic.to_string()
    }

    /// Returns a reference to the secp256k1 context.
    pub fn secp(&self) -> &Secp256k1<All> {
        &self.secp
    }
}

/// `ripemd160(sha256(pubkey))`, the Cosmos account id of a public key.
pub fn account_id(public_key: &PubKey) -> [u8; 20] {
    hash160::Hash::hash(public_key).to_byte_array()
}

impl Signer for Wallet {
    fn public_key(&self) -> PubKey {
        self.public_key
    }

    fn sign_direct(
        &self,
        sign_doc: &[u8],
    ) -> Result<[u8; 64], Box<dyn std::error::Error + Send + Sync>> {
        Ok(ecdsa::sign_sign_doc(&self.secp, &self.secret_key, sign_doc))
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address.to_string())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
