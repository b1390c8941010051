//! Transaction assembly and `SIGN_MODE_DIRECT` signing.
//!
//! A signed tx is built in three encodings:
//!
//! 1. `TxBody` with the packed messages, and `AuthInfo` with the signer's
//!    public key, sequence and fee.
//! 2. `SignDoc` over those bytes, the chain id and the account number.
//!    The signer hashes and signs this.
//! 3. `TxRaw` combining the body, auth info and the signature, which is
//!    what gets broadcast.

use prost::Message;
use sdk_core::Coin;
use signer::Signer;
use transport::proto::{
    self, Any, AuthInfo, Fee, ModeInfo, Secp256k1PubKey, SignDoc, SignerInfo, TxBody, TxRaw,
};

use crate::SdkError;

/// Per-transaction signing parameters.
#[derive(Debug, Clone)]
pub struct SignContext<'a> {
    pub chain_id: &'a str,
    pub account_number: u64,
    pub sequence: u64,
    pub gas_limit: u64,
    pub fee: Coin,
}

/// Builds and signs a transaction, returning the encoded `TxRaw`.
///
/// # Errors
///
/// Returns [`SdkError::SigningFailed`] if the signer rejects the sign doc.
pub fn build_signed_tx(
    signer: &dyn Signer,
    messages: Vec<Any>,
    ctx: &SignContext<'_>,
) -> Result<Vec<u8>, SdkError> {
    let body_bytes = TxBody {
        messages,
        memo: String::new(),
        timeout_height: 0,
    }
    .encode_to_vec();

    let public_key = Any::pack(
        proto::SECP256K1_PUBKEY_TYPE_URL,
        &Secp256k1PubKey {
            key: signer.public_key().to_vec(),
        },
    );
    let auth_info_bytes = AuthInfo {
        signer_infos: vec![SignerInfo {
            public_key: Some(public_key),
            mode_info: Some(ModeInfo::direct()),
            sequence: ctx.sequence,
        }],
        fee: Some(Fee {
            amount: vec![proto::Coin::from(&ctx.fee)],
            gas_limit: ctx.gas_limit,
            payer: String::new(),
            granter: String::new(),
        }),
    }
    .encode_to_vec();

    let sign_doc = SignDoc {
        body_bytes: body_bytes.clone(),
        auth_info_bytes: auth_info_bytes.clone(),
        chain_id: ctx.chain_id.to_owned(),
        account_number: ctx.account_number,
    }
    .encode_to_vec();

    let signature = signer
        .sign_direct(&sign_doc)
        .map_err(|e| SdkError::SigningFailed(e.to_string()))?;

    Ok(TxRaw {
        body_bytes,
        auth_info_bytes,
        signatures: vec![signature.to_vec()],
    }
    .encode_to_vec())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
