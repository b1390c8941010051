//! Secret contract message encryption.
//!
//! Wire-format compatible with `secretjs`' `EncryptionUtilsImpl`:
//!
//! | Step | Primitive |
//! |------|-----------|
//! | Key agreement | x25519(user secret, consensus IO public key) |
//! | Key derivation | HKDF-SHA256(shared ‖ nonce, [`HKDF_SALT`]) → 32 bytes |
//! | Cipher | AES-128-SIV, one empty associated-data header |
//!
//! An encrypted message is `nonce (32) ‖ user public key (32) ‖ siv_tag ‖ ct`.
//! The plaintext is the contract code hash (hex) followed by the JSON message.
//! Query responses and contract errors come back encrypted under the same
//! nonce, so callers keep the nonce returned by [`ContractCipher::encrypt`].
//!
//! # Example
//!
//! ```
//! use secret_crypto::encryption::ContractCipher;
//! use x25519_dalek::{PublicKey, StaticSecret};
//!
//! let chain = StaticSecret::from([9u8; 32]);
//! let io_key = PublicKey::from(&chain).to_bytes();
//!
//! let cipher = ContractCipher::new([7u8; 32], io_key);
//! let mut rng = rand::thread_rng();
//! let sealed = cipher.encrypt("abcd", br#"{"ping":{}}"#, &mut rng).unwrap();
//!
//! let plaintext = cipher.decrypt(&sealed.ciphertext, &sealed.nonce).unwrap();
//! assert_eq!(plaintext, br#"abcd{"ping":{}}"#);
//! ```

use std::fmt;

use aes_siv::KeyInit;
use aes_siv::siv::Aes128Siv;
use bitcoin::hashes::{Hash, HashEngine, hmac, sha256};
use rand_core::{CryptoRng, RngCore};
use x25519_dalek::{PublicKey, StaticSecret};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Salt shared by every Secret Network client and enclave.
pub const HKDF_SALT: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x4b, 0xea, 0xd8, 0xdf, 0x69, 0x99,
    0x08, 0x52, 0xc2, 0x02, 0xdb, 0x0e, 0x00, 0x97, 0xc1, 0xa1, 0x2e, 0xa6, 0x37, 0xd7, 0xe9, 0x6d,
];

/// Length of the per-message nonce.
pub const NONCE_SIZE: usize = 32;

/// Length of an x25519 public key.
pub const PUBKEY_SIZE: usize = 32;

const HEADER_SIZE: usize = NONCE_SIZE + PUBKEY_SIZE;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors returned by contract message encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionError {
    /// AES-SIV encryption failed.
    EncryptionFailed,
    /// AES-SIV decryption failed (wrong key, wrong nonce or tampered data).
    DecryptionFailed,
}

impl fmt::Display for EncryptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncryptionFailed => write!(f, "contract message encryption failed"),
            Self::DecryptionFailed => write!(f, "contract message decryption failed"),
        }
    }
}

impl std::error::Error for EncryptionError {}

// ---------------------------------------------------------------------------
// ContractCipher
// ---------------------------------------------------------------------------

/// An encrypted contract message together with the nonce used to seal it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    pub nonce: [u8; NONCE_SIZE],
    /// Full wire payload: `nonce ‖ pubkey ‖ ciphertext`.
    pub payload: Vec<u8>,
    /// The AES-SIV output alone, without the header.
    pub ciphertext: Vec<u8>,
}

/// Per-wallet encryption state for contract messages.
///
/// Holds the user's x25519 secret (derived from a 32-byte seed) and the
/// chain's consensus IO public key, which is fetched once per client.
pub struct ContractCipher {
    secret: StaticSecret,
    public: [u8; PUBKEY_SIZE],
    consensus_io_pubkey: PublicKey,
}

impl ContractCipher {
    /// Creates a cipher from a user seed and the chain's IO public key.
    pub fn new(seed: [u8; 32], consensus_io_pubkey: [u8; PUBKEY_SIZE]) -> Self {
        let secret = StaticSecret::from(seed);
        let public = PublicKey::from(&secret).to_bytes();
        Self {
            secret,
            public,
            consensus_io_pubkey: PublicKey::from(consensus_io_pubkey),
        }
    }

    /// The user's x25519 public key, embedded in every payload.
    pub fn public_key(&self) -> [u8; PUBKEY_SIZE] {
        self.public
    }

    /// Derives the AES-SIV key for a given nonce.
    pub fn tx_encryption_key(&self, nonce: &[u8; NONCE_SIZE]) -> [u8; 32] {
        let shared = self.secret.diffie_hellman(&self.consensus_io_pubkey);
        derive_tx_key(shared.as_bytes(), nonce)
    }

    /// Encrypts `code_hash ‖ msg` under a fresh random nonce.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptionError::EncryptionFailed`] if AES-SIV fails.
    pub fn encrypt(
        &self,
        code_hash: &str,
        msg: &[u8],
        rng: &mut (impl CryptoRng + RngCore),
    ) -> Result<SealedMessage, EncryptionError> {
        let mut nonce = [0u8; NONCE_SIZE];
        rng.fill_bytes(&mut nonce);
        self.encrypt_with_nonce(nonce, code_hash, msg)
    }

    /// Encrypts `code_hash ‖ msg` under a caller-chosen nonce.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptionError::EncryptionFailed`] if AES-SIV fails.
    pub fn encrypt_with_nonce(
        &self,
        nonce: [u8; NONCE_SIZE],
        code_hash: &str,
        msg: &[u8],
    ) -> Result<SealedMessage, EncryptionError> {
        let key = self.tx_encryption_key(&nonce);
        let mut plaintext = Vec::with_capacity(code_hash.len() + msg.len());
        plaintext.extend_from_slice(code_hash.as_bytes());
        plaintext.extend_from_slice(msg);

        let mut siv =
            Aes128Siv::new_from_slice(&key).map_err(|_| EncryptionError::EncryptionFailed)?;
        let ciphertext = siv
            .encrypt([b"".as_slice()], &plaintext)
            .map_err(|_| EncryptionError::EncryptionFailed)?;

        let mut payload = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&self.public);
        payload.extend_from_slice(&ciphertext);

        Ok(SealedMessage {
            nonce,
            payload,
            ciphertext,
        })
    }

    /// Decrypts a response sealed by the enclave under `nonce`.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptionError::DecryptionFailed`] on a key or tag mismatch.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        nonce: &[u8; NONCE_SIZE],
    ) -> Result<Vec<u8>, EncryptionError> {
        let key = self.tx_encryption_key(nonce);
        let mut siv =
            Aes128Siv::new_from_slice(&key).map_err(|_| EncryptionError::DecryptionFailed)?;
        let plaintext = siv
            .decrypt([b"".as_slice()], ciphertext)
            .map_err(|_| EncryptionError::DecryptionFailed)?;
        Ok(plaintext)
    }
}

/// Generates a fresh 32-byte encryption seed.
pub fn generate_seed(rng: &mut (impl CryptoRng + RngCore)) -> [u8; 32] {
    let mut seed = [0u8; 32];
    rng.fill_bytes(&mut seed);
    seed
}

// ---------------------------------------------------------------------------
// HKDF-SHA256
// ---------------------------------------------------------------------------

fn derive_tx_key(shared: &[u8; 32], nonce: &[u8; NONCE_SIZE]) -> [u8; 32] {
    let mut ikm = [0u8; 64];
    ikm[..32].copy_from_slice(shared);
    ikm[32..].copy_from_slice(nonce);
    hkdf_sha256(&HKDF_SALT, &ikm)
}

/// HKDF-SHA256 with empty info and a single 32-byte output block.
fn hkdf_sha256(salt: &[u8], ikm: &[u8]) -> [u8; 32] {
    let mut extract = hmac::HmacEngine::<sha256::Hash>::new(salt);
    extract.input(ikm);
    let prk = hmac::Hmac::from_engine(extract);

    let mut expand = hmac::HmacEngine::<sha256::Hash>::new(prk.as_byte_array());
    expand.input(&[1u8]);
    let okm = hmac::Hmac::from_engine(expand);
    *okm.as_byte_array()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
