//! Wallet-bound Secret Network client.
//!
//! [`SecretNetworkClient`] ties a signer and a contract-encryption seed to
//! one LCD endpoint and chain id. Every contract payload is encrypted for
//! the chain enclave before it leaves the process, and contract output
//! (wasm event attributes, query answers, error messages) is decrypted on
//! the way back with the nonce that sealed the request.
//!
//! The consensus IO key needed for encryption is fetched on first use and
//! cached for the life of the client.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use config::NetworkConfig;
use rand_core::OsRng;
use sdk_core::{Coin, SecretAddress};
use secret_crypto::encryption::{self, NONCE_SIZE, PUBKEY_SIZE};
use secret_crypto::{ContractCipher, SealedMessage};
use serde_json::Value;
use signer::{Signer, Wallet, account_id};
use tokio::sync::OnceCell;
use transport::proto::{
    self, Any, MsgExecuteContract, MsgInstantiateContract, MsgStoreCode,
};
use transport::{LcdConfig, LcdError, LcdTransport, LcdTxResponse};

use crate::chain::{ChainClient, ContractRef, ExecuteRequest, InstantiateRequest};
use crate::tx::{SignContext, build_signed_tx};
use crate::{SdkError, TxResponse};

/// Marks an enclave-encrypted error inside a raw log or gateway message.
const ENCRYPTED_ERROR_MARKER: &str = "encrypted: ";

// ---------------------------------------------------------------------------
// SecretNetworkClient
// ---------------------------------------------------------------------------

struct ClientInner {
    config: NetworkConfig,
    transport: LcdTransport,
    signer: Box<dyn Signer>,
    address: String,
    sender: Vec<u8>,
    encryption_seed: [u8; 32],
    cipher: OnceCell<ContractCipher>,
}

/// A client bound to one wallet on one chain.
///
/// `Clone`-able (wraps an `Arc`); clones share the transport and the cached
/// encryption key.
#[derive(Clone)]
pub struct SecretNetworkClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for SecretNetworkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretNetworkClient")
            .field("address", &self.inner.address)
            .field("chain_id", &self.inner.config.chain_id)
            .field("transport", &self.inner.transport)
            .finish()
    }
}

impl SecretNetworkClient {
    /// Creates a client with a freshly generated wallet and encryption seed.
    ///
    /// No network I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Transport`] if the LCD URL is invalid.
    pub fn new(config: &NetworkConfig) -> Result<Self, SdkError> {
        let wallet = Wallet::generate(&mut OsRng)?;
        let seed = encryption::generate_seed(&mut OsRng);
        Self::with_wallet(config, wallet, seed)
    }

    /// Creates a client for an existing wallet.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Transport`] if the LCD URL is invalid.
    pub fn with_wallet(
        config: &NetworkConfig,
        wallet: Wallet,
        encryption_seed: [u8; 32],
    ) -> Result<Self, SdkError> {
        Self::with_signer(config, wallet, encryption_seed)
    }

    /// Creates a client for any [`Signer`].
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Transport`] if the LCD URL is invalid.
    pub fn with_signer(
        config: &NetworkConfig,
        signer: impl Signer + 'static,
        encryption_seed: [u8; 32],
    ) -> Result<Self, SdkError> {
        let lcd_config = LcdConfig::builder()
            .request_timeout(config.request_timeout)
            .build();
        let transport = LcdTransport::new(&config.lcd_url, lcd_config)?;

        let address = SecretAddress::from_account_id(account_id(&signer.public_key()));
        tracing::info!(
            address = %address,
            chain_id = %config.chain_id,
            lcd_url = %transport.base_url(),
            "client initialized"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                config: config.clone(),
                transport,
                signer: Box::new(signer),
                address: address.to_string(),
                sender: address.as_bytes().to_vec(),
                encryption_seed,
                cipher: OnceCell::new(),
            }),
        })
    }

    // -----------------------------------------------------------------------
    // Encryption
    // -----------------------------------------------------------------------

    async fn cipher(&self) -> Result<&ContractCipher, SdkError> {
        self.inner
            .cipher
            .get_or_try_init(|| async {
                let key = self.inner.transport.tx_key().await?;
                let key: [u8; PUBKEY_SIZE] = key.try_into().map_err(|k: Vec<u8>| {
                    SdkError::InvalidPayload(format!("tx key has {} bytes", k.len()))
                })?;
                tracing::debug!("fetched consensus io key");
                Ok::<_, SdkError>(ContractCipher::new(self.inner.encryption_seed, key))
            })
            .await
    }

    async fn seal(&self, code_hash: &str, msg: &Value) -> Result<SealedMessage, SdkError> {
        let json =
            serde_json::to_vec(msg).map_err(|e| SdkError::InvalidPayload(e.to_string()))?;
        let sealed = self.cipher().await?.encrypt(code_hash, &json, &mut OsRng)?;
        Ok(sealed)
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    /// Signs, broadcasts and waits for inclusion of a single-message tx.
    async fn submit(&self, message: Any, gas_limit: u64) -> Result<TxResponse, SdkError> {
        let inner = &self.inner;
        let account = inner
            .transport
            .account(&inner.address)
            .await?
            .ok_or_else(|| SdkError::AccountNotFound(inner.address.clone()))?;

        let ctx = SignContext {
            chain_id: &inner.config.chain_id,
            account_number: account.account_number,
            sequence: account.sequence,
            gas_limit,
            fee: Coin::new(inner.config.fee_for_gas(gas_limit), inner.config.denom),
        };
        let tx_bytes = build_signed_tx(inner.signer.as_ref(), vec![message], &ctx)?;

        let checked = inner.transport.broadcast_tx(&tx_bytes).await?;
        if checked.code != 0 {
            tracing::debug!(
                tx_hash = %checked.txhash,
                code = checked.code,
                "tx rejected by check_tx"
            );
            return Ok(checked.into());
        }
        tracing::debug!(tx_hash = %checked.txhash, "tx broadcast");

        let included = self.wait_for_tx(&checked.txhash).await?;
        tracing::debug!(
            tx_hash = %included.txhash,
            height = included.height,
            code = included.code,
            gas_used = included.gas_used,
            "tx included"
        );
        Ok(included.into())
    }

    async fn wait_for_tx(&self, tx_hash: &str) -> Result<LcdTxResponse, SdkError> {
        let timeout = self.inner.config.tx_inclusion_timeout;
        tokio::time::timeout(timeout, self.poll_tx(tx_hash))
            .await
            .map_err(|_| SdkError::TxTimeout {
                tx_hash: tx_hash.to_owned(),
            })?
    }

    async fn poll_tx(&self, tx_hash: &str) -> Result<LcdTxResponse, SdkError> {
        loop {
            if let Some(tx) = self.inner.transport.get_tx(tx_hash).await? {
                return Ok(tx);
            }
            tokio::time::sleep(self.inner.config.tx_poll_interval).await;
        }
    }

    /// Submits a contract message and decrypts what the contract emitted.
    async fn submit_sealed(
        &self,
        message: Any,
        nonce: &[u8; NONCE_SIZE],
        gas_limit: u64,
    ) -> Result<TxResponse, SdkError> {
        let mut tx = self.submit(message, gas_limit).await?;
        let cipher = self.cipher().await?;
        decrypt_tx_response(cipher, nonce, &mut tx);
        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// ChainClient
// ---------------------------------------------------------------------------

impl ChainClient for SecretNetworkClient {
    fn address(&self) -> &str {
        &self.inner.address
    }

    async fn balance(&self, denom: &str) -> Result<u128, SdkError> {
        Ok(self
            .inner
            .transport
            .balance(&self.inner.address, denom)
            .await?)
    }

    async fn store_code(&self, wasm: Vec<u8>, gas_limit: u64) -> Result<TxResponse, SdkError> {
        tracing::debug!(size = wasm.len(), gas_limit, "uploading contract code");
        let msg = MsgStoreCode {
            sender: self.inner.sender.clone(),
            wasm_byte_code: wasm,
            source: String::new(),
            builder: String::new(),
        };
        self.submit(Any::pack(proto::MSG_STORE_CODE_TYPE_URL, &msg), gas_limit)
            .await
    }

    async fn code_hash_by_code_id(&self, code_id: u64) -> Result<Option<String>, SdkError> {
        Ok(self.inner.transport.code_hash_by_code_id(code_id).await?)
    }

    async fn instantiate_contract(
        &self,
        request: InstantiateRequest,
        gas_limit: u64,
    ) -> Result<TxResponse, SdkError> {
        let sealed = self.seal(&request.code_hash, &request.init_msg).await?;
        let msg = MsgInstantiateContract {
            sender: self.inner.sender.clone(),
            callback_code_hash: String::new(),
            code_id: request.code_id,
            label: request.label,
            init_msg: sealed.payload,
            init_funds: Vec::new(),
            callback_sig: Vec::new(),
            admin: String::new(),
        };
        self.submit_sealed(
            Any::pack(proto::MSG_INSTANTIATE_CONTRACT_TYPE_URL, &msg),
            &sealed.nonce,
            gas_limit,
        )
        .await
    }

    async fn execute_contract(
        &self,
        request: ExecuteRequest,
        gas_limit: u64,
    ) -> Result<TxResponse, SdkError> {
        let contract = SecretAddress::parse(&request.contract.address)
            .map_err(|e| SdkError::InvalidPayload(e.to_string()))?;
        let sealed = self.seal(&request.contract.code_hash, &request.msg).await?;
        let msg = MsgExecuteContract {
            sender: self.inner.sender.clone(),
            contract: contract.as_bytes().to_vec(),
            msg: sealed.payload,
            callback_code_hash: String::new(),
            sent_funds: request.sent_funds.iter().map(proto::Coin::from).collect(),
            callback_sig: Vec::new(),
        };
        self.submit_sealed(
            Any::pack(proto::MSG_EXECUTE_CONTRACT_TYPE_URL, &msg),
            &sealed.nonce,
            gas_limit,
        )
        .await
    }

    async fn query_contract(
        &self,
        contract: &ContractRef,
        query: &Value,
    ) -> Result<Value, SdkError> {
        let sealed = self.seal(&contract.code_hash, query).await?;
        let cipher = self.cipher().await?;

        let data = match self
            .inner
            .transport
            .query_contract(&contract.address, &sealed.payload)
            .await
        {
            Ok(data) => data,
            Err(LcdError::Status { message, .. }) => {
                let message =
                    decrypt_error_message(cipher, &sealed.nonce, &message).unwrap_or(message);
                return Err(SdkError::QueryFailed(message));
            }
            Err(e) => return Err(e.into()),
        };

        // The enclave answers with base64(JSON), encrypted.
        let plaintext = cipher.decrypt(&data, &sealed.nonce)?;
        let json = BASE64
            .decode(&plaintext)
            .map_err(|e| SdkError::InvalidPayload(format!("query answer: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| SdkError::InvalidPayload(format!("query answer: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Response decryption
// ---------------------------------------------------------------------------

/// Decrypts contract event attributes and an encrypted error in `raw_log`.
///
/// Attributes that are not valid ciphertext under `nonce` are left as-is;
/// contracts may emit plaintext attributes.
fn decrypt_tx_response(cipher: &ContractCipher, nonce: &[u8; NONCE_SIZE], tx: &mut TxResponse) {
    tx.for_each_contract_attribute(|attr| {
        if attr.key == "contract_address" {
            return;
        }
        if let Some(key) = decrypt_base64(cipher, nonce, &attr.key) {
            attr.key = key;
        }
        if let Some(value) = decrypt_base64(cipher, nonce, &attr.value) {
            attr.value = value;
        }
    });

    if !tx.is_success() {
        if let Some(raw_log) = decrypt_error_message(cipher, nonce, &tx.raw_log) {
            tx.raw_log = raw_log;
        }
    }
}

fn decrypt_base64(cipher: &ContractCipher, nonce: &[u8; NONCE_SIZE], text: &str) -> Option<String> {
    let bytes = BASE64.decode(text).ok()?;
    let plaintext = cipher.decrypt(&bytes, nonce).ok()?;
    String::from_utf8(plaintext).ok()
}

/// Replaces `encrypted: <base64>` inside `message` with its plaintext.
fn decrypt_error_message(
    cipher: &ContractCipher,
    nonce: &[u8; NONCE_SIZE],
    message: &str,
) -> Option<String> {
    let marker = message.find(ENCRYPTED_ERROR_MARKER)?;
    let start = marker + ENCRYPTED_ERROR_MARKER.len();
    let rest = &message[start..];
    let end = rest.find(':').unwrap_or(rest.len());
    let plaintext = decrypt_base64(cipher, nonce, rest[..end].trim())?;
    Some(format!("{}{}{}", &message[..marker], plaintext, &rest[end..]))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
