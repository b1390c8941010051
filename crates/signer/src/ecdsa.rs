//! ECDSA signing and verification of Cosmos sign documents.
//!
//! Cosmos `SIGN_MODE_DIRECT` signs `sha256(sign_doc_bytes)` with secp256k1
//! and transmits the 64-byte compact `r ‖ s` encoding. libsecp256k1 always
//! produces low-S signatures, which is what the chain's ante handler checks.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`sign_sign_doc`] | SHA256-hash sign-doc bytes, sign, return compact bytes |
//! | [`verify_sign_doc`] | Verify compact bytes against sign-doc bytes |
//! | [`signature_from_compact`] | Decode a compact signature |

use std::fmt;

use bitcoin::hashes::{Hash, sha256};
use bitcoin::secp256k1::ecdsa::Signature;
use bitcoin::secp256k1::{Message, PublicKey, Secp256k1, SecretKey, Signing, Verification};

/// Length of a compact ECDSA signature.
pub const COMPACT_SIGNATURE_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors returned by ECDSA operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaError {
    /// The signature does not verify against the given public key and digest.
    VerificationFailed,
    /// The provided bytes are not a valid compact (64-byte) ECDSA signature.
    InvalidCompact,
}

impl fmt::Display for EcdsaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VerificationFailed => write!(f, "ECDSA signature verification failed"),
            Self::InvalidCompact => write!(f, "invalid compact ECDSA signature"),
        }
    }
}

impl std::error::Error for EcdsaError {}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// SHA256-hash serialized sign-doc bytes and return the compact signature.
pub fn sign_sign_doc(
    secp: &Secp256k1<impl Signing>,
    secret_key: &SecretKey,
    sign_doc: &[u8],
) -> [u8; COMPACT_SIGNATURE_LEN] {
    let digest = sha256::Hash::hash(sign_doc);
    let msg = Message::from_digest(digest.to_byte_array());
    secp.sign_ecdsa(&msg, secret_key).serialize_compact()
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a compact signature over serialized sign-doc bytes.
///
/// # Errors
///
/// Returns [`EcdsaError::InvalidCompact`] for malformed bytes and
/// [`EcdsaError::VerificationFailed`] if the signature does not match.
pub fn verify_sign_doc(
    secp: &Secp256k1<impl Verification>,
    public_key: &PublicKey,
    sign_doc: &[u8],
    signature: &[u8],
) -> Result<(), EcdsaError> {
    let signature = signature_from_compact(signature)?;
    let digest = sha256::Hash::hash(sign_doc);
    let msg = Message::from_digest(digest.to_byte_array());
    secp.verify_ecdsa(&msg, &signature, public_key)
        .map_err(|_| EcdsaError::VerificationFailed)
}

/// Decode a compact (64-byte) ECDSA signature.
///
/// # Errors
///
/// Returns [`EcdsaError::InvalidCompact`] if the bytes are not valid.
pub fn signature_from_compact(bytes: &[u8]) -> Result<Signature, EcdsaError> {
    Signature::from_compact(bytes).map_err(|_| EcdsaError::InvalidCompact)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
