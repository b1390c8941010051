//! Protobuf messages for Cosmos transactions and the Secret compute module.
//!
//! Only the subset needed to sign and broadcast `SIGN_MODE_DIRECT`
//! transactions is declared. Field tags follow the upstream `.proto` files:
//!
//! | Message | Source |
//! |---------|--------|
//! | [`TxBody`], [`AuthInfo`], [`SignerInfo`], [`ModeInfo`], [`Fee`], [`SignDoc`], [`TxRaw`] | `cosmos/tx/v1beta1/tx.proto` |
//! | [`Coin`] | `cosmos/base/v1beta1/coin.proto` |
//! | [`Secp256k1PubKey`] | `cosmos/crypto/secp256k1/keys.proto` |
//! | [`MsgStoreCode`], [`MsgInstantiateContract`], [`MsgExecuteContract`] | `secret/compute/v1beta1/msg.proto` |
//!
//! `ModeInfo.sum` is a oneof in the upstream schema; with a single variant
//! it encodes identically to an optional message at the same tag.

use prost::Message;

/// Type URL of a secp256k1 public key.
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// Type URL of `MsgStoreCode`.
pub const MSG_STORE_CODE_TYPE_URL: &str = "/secret.compute.v1beta1.MsgStoreCode";

/// Type URL of `MsgInstantiateContract`.
pub const MSG_INSTANTIATE_CONTRACT_TYPE_URL: &str =
    "/secret.compute.v1beta1.MsgInstantiateContract";

/// Type URL of `MsgExecuteContract`.
pub const MSG_EXECUTE_CONTRACT_TYPE_URL: &str = "/secret.compute.v1beta1.MsgExecuteContract";

// ---------------------------------------------------------------------------
// google.protobuf.Any
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

impl Any {
    /// Packs a message under the given type URL.
    pub fn pack(type_url: &str, msg: &impl Message) -> Self {
        Self {
            type_url: type_url.to_owned(),
            value: msg.encode_to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// cosmos.base / cosmos.crypto
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct Coin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

impl From<&sdk_core::Coin> for Coin {
    fn from(coin: &sdk_core::Coin) -> Self {
        Self {
            denom: coin.denom.clone(),
            amount: coin.amount.to_string(),
        }
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct Secp256k1PubKey {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
}

// ---------------------------------------------------------------------------
// cosmos.tx.v1beta1
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct TxBody {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<Any>,
    #[prost(string, tag = "2")]
    pub memo: String,
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct AuthInfo {
    #[prost(message, repeated, tag = "1")]
    pub signer_infos: Vec<SignerInfo>,
    #[prost(message, optional, tag = "2")]
    pub fee: Option<Fee>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SignerInfo {
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<Any>,
    #[prost(message, optional, tag = "2")]
    pub mode_info: Option<ModeInfo>,
    #[prost(uint64, tag = "3")]
    pub sequence: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct ModeInfo {
    #[prost(message, optional, tag = "1")]
    pub single: Option<ModeInfoSingle>,
}

impl ModeInfo {
    /// `ModeInfo { single: { mode: SIGN_MODE_DIRECT } }`.
    pub fn direct() -> Self {
        Self {
            single: Some(ModeInfoSingle {
                mode: SignMode::Direct as i32,
            }),
        }
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct ModeInfoSingle {
    #[prost(enumeration = "SignMode", tag = "1")]
    pub mode: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum SignMode {
    Unspecified = 0,
    Direct = 1,
}

#[derive(Clone, PartialEq, Message)]
pub struct Fee {
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<Coin>,
    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,
    #[prost(string, tag = "3")]
    pub payer: String,
    #[prost(string, tag = "4")]
    pub granter: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct SignDoc {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(string, tag = "3")]
    pub chain_id: String,
    #[prost(uint64, tag = "4")]
    pub account_number: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct TxRaw {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// secret.compute.v1beta1
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct MsgStoreCode {
    /// Raw 20-byte account id of the uploader.
    #[prost(bytes = "vec", tag = "1")]
    pub sender: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub wasm_byte_code: Vec<u8>,
    #[prost(string, tag = "3")]
    pub source: String,
    #[prost(string, tag = "4")]
    pub builder: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgInstantiateContract {
    #[prost(bytes = "vec", tag = "1")]
    pub sender: Vec<u8>,
    #[prost(string, tag = "2")]
    pub callback_code_hash: String,
    #[prost(uint64, tag = "3")]
    pub code_id: u64,
    #[prost(string, tag = "4")]
    pub label: String,
    /// Encrypted `code_hash ‖ json` payload.
    #[prost(bytes = "vec", tag = "5")]
    pub init_msg: Vec<u8>,
    #[prost(message, repeated, tag = "6")]
    pub init_funds: Vec<Coin>,
    #[prost(bytes = "vec", tag = "7")]
    pub callback_sig: Vec<u8>,
    #[prost(string, tag = "8")]
    pub admin: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgExecuteContract {
    #[prost(bytes = "vec", tag = "1")]
    pub sender: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub contract: Vec<u8>,
    /// Encrypted `code_hash ‖ json` payload.
    #[prost(bytes = "vec", tag = "3")]
    pub msg: Vec<u8>,
    #[prost(string, tag = "4")]
    pub callback_code_hash: String,
    #[prost(message, repeated, tag = "5")]
    pub sent_funds: Vec<Coin>,
    #[prost(bytes = "vec", tag = "6")]
    pub callback_sig: Vec<u8>,
}
