//! LCD (REST gateway) transport for Secret Network nodes.
//!
//! Provides [`LcdTransport`] -- a thin `reqwest` client over the Cosmos SDK
//! and Secret compute REST routes the harness needs:
//!
//! | Method | Route |
//! |--------|-------|
//! | [`LcdTransport::account`] | `GET /cosmos/auth/v1beta1/accounts/{address}` |
//! | [`LcdTransport::balance`] | `GET /cosmos/bank/v1beta1/balances/{address}/by_denom` |
//! | [`LcdTransport::code_hash_by_code_id`] | `GET /compute/v1beta1/code_hash/by_code_id/{id}` |
//! | [`LcdTransport::tx_key`] | `GET /registration/v1beta1/tx-key` |
//! | [`LcdTransport::query_contract`] | `GET /compute/v1beta1/query/{address}` |
//! | [`LcdTransport::broadcast_tx`] | `POST /cosmos/tx/v1beta1/txs` |
//! | [`LcdTransport::get_tx`] | `GET /cosmos/tx/v1beta1/txs/{hash}` |
//!
//! Numeric fields that the gateway renders as JSON strings (`"12"`) are
//! parsed into integers here so callers never see the string encoding.
//!
//! # Example
//!
//! ```no_run
//! use transport::{LcdConfig, LcdTransport};
//!
//! # async fn example() -> Result<(), transport::LcdError> {
//! let lcd = LcdTransport::new("http://localhost:1317", LcdConfig::default())?;
//! let balance = lcd.balance("secret1...", "uscrt").await?;
//! println!("{balance}uscrt");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, Response, StatusCode};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from the LCD transport layer.
#[derive(Debug)]
pub enum LcdError {
    /// The endpoint URL is invalid.
    InvalidEndpoint { url: String, reason: String },

    /// The HTTP request could not be sent or the connection failed.
    Request(String),

    /// The node answered with a non-success status.
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    Decode(String),
}

impl fmt::Display for LcdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEndpoint { url, reason } => {
                write!(f, "invalid endpoint '{url}': {reason}")
            }
            Self::Request(e) => write!(f, "LCD request failed: {e}"),
            Self::Status { status, message } => write!(f, "LCD error ({status}): {message}"),
            Self::Decode(e) => write!(f, "unexpected LCD response: {e}"),
        }
    }
}

impl std::error::Error for LcdError {}

impl From<reqwest::Error> for LcdError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the LCD transport.
#[derive(Debug, Clone)]
pub struct LcdConfig {
    /// TCP connect timeout. Default: 10 s.
    pub connect_timeout: Duration,

    /// Per-request timeout. Default: 30 s.
    pub request_timeout: Duration,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl LcdConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> LcdConfigBuilder {
        LcdConfigBuilder::default()
    }
}

/// Builder for [`LcdConfig`].
#[derive(Debug, Default)]
pub struct LcdConfigBuilder {
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
}

impl LcdConfigBuilder {
    /// Sets the TCP connect timeout.
    pub fn connect_timeout(mut self, d: Duration) -> Self {
        self.connect_timeout = Some(d);
        self
    }

    /// Sets the per-request timeout.
    pub fn request_timeout(mut self, d: Duration) -> Self {
        self.request_timeout = Some(d);
        self
    }

    /// Builds the configuration, filling unset values with defaults.
    pub fn build(self) -> LcdConfig {
        let d = LcdConfig::default();
        LcdConfig {
            connect_timeout: self.connect_timeout.unwrap_or(d.connect_timeout),
            request_timeout: self.request_timeout.unwrap_or(d.request_timeout),
        }
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Account number and sequence of an on-chain account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AccountInfo {
    #[serde(deserialize_with = "u64_from_str")]
    pub account_number: u64,
    #[serde(deserialize_with = "u64_from_str")]
    pub sequence: u64,
}

/// `tx_response` object of the tx service, as rendered by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LcdTxResponse {
    #[serde(deserialize_with = "u64_from_str")]
    pub height: u64,
    pub txhash: String,
    pub codespace: String,
    pub code: u32,
    pub data: String,
    pub raw_log: String,
    pub logs: Vec<LcdLog>,
    #[serde(deserialize_with = "u64_from_str")]
    pub gas_wanted: u64,
    #[serde(deserialize_with = "u64_from_str")]
    pub gas_used: u64,
    /// Flat ABCI events. Chains that stopped populating `logs` only fill this.
    pub events: Vec<LcdEvent>,
}

/// Events emitted by a single message of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LcdLog {
    pub msg_index: u32,
    pub log: String,
    pub events: Vec<LcdEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LcdEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<LcdAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LcdAttribute {
    pub key: String,
    pub value: String,
}

#[derive(Deserialize)]
struct AccountEnvelope {
    account: AccountInfo,
}

#[derive(Deserialize)]
struct BalanceEnvelope {
    balance: Option<BalanceCoin>,
}

#[derive(Deserialize)]
struct BalanceCoin {
    #[serde(deserialize_with = "u128_from_str")]
    amount: u128,
}

#[derive(Deserialize)]
struct CodeHashEnvelope {
    #[serde(default)]
    code_hash: String,
}

#[derive(Deserialize)]
struct TxKeyEnvelope {
    key: String,
}

#[derive(Deserialize)]
struct QueryEnvelope {
    data: String,
}

#[derive(Deserialize)]
struct TxEnvelope {
    tx_response: LcdTxResponse,
}

#[derive(Serialize)]
struct BroadcastRequest<'a> {
    tx_bytes: String,
    mode: &'a str,
}

/// gRPC-gateway error body: `{"code": 2, "message": "...", "details": []}`.
#[derive(Deserialize)]
struct GatewayError {
    #[serde(default)]
    message: String,
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// REST client for a single Secret Network node.
///
/// `LcdTransport` is `Clone + Send + Sync`; clones share the underlying
/// connection pool.
#[derive(Clone)]
pub struct LcdTransport {
    client: Client,
    base_url: String,
}

impl fmt::Debug for LcdTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LcdTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LcdTransport {
    /// Creates a transport for the node at `base_url`.
    ///
    /// No network I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns [`LcdError::InvalidEndpoint`] if the URL does not parse or is
    /// not `http(s)`, or if the HTTP client cannot be built.
    pub fn new(base_url: &str, config: LcdConfig) -> Result<Self, LcdError> {
        let parsed = reqwest::Url::parse(base_url).map_err(|e| LcdError::InvalidEndpoint {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(LcdError::InvalidEndpoint {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LcdError::InvalidEndpoint {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the node base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches account number and sequence, or `None` for unknown accounts.
    pub async fn account(&self, address: &str) -> Result<Option<AccountInfo>, LcdError> {
        let url = format!("{}/cosmos/auth/v1beta1/accounts/{address}", self.base_url);
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let envelope: AccountEnvelope = check_status(response).await?.json().await?;
        Ok(Some(envelope.account))
    }

    /// Fetches the balance of `address` in `denom`. Missing balances are zero.
    pub async fn balance(&self, address: &str, denom: &str) -> Result<u128, LcdError> {
        let url = format!(
            "{}/cosmos/bank/v1beta1/balances/{address}/by_denom",
            self.base_url
        );
        let response = self
            .client
            .get(url)
            .query(&[("denom", denom)])
            .send()
            .await?;
        let envelope: BalanceEnvelope = check_status(response).await?.json().await?;
        Ok(envelope.balance.map_or(0, |c| c.amount))
    }

    /// Resolves the code hash of an uploaded code id.
    ///
    /// Returns `None` when the code id is unknown or the hash is empty.
    pub async fn code_hash_by_code_id(&self, code_id: u64) -> Result<Option<String>, LcdError> {
        let url = format!(
            "{}/compute/v1beta1/code_hash/by_code_id/{code_id}",
            self.base_url
        );
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let envelope: CodeHashEnvelope = check_status(response).await?.json().await?;
        Ok(Some(envelope.code_hash).filter(|h| !h.is_empty()))
    }

    /// Fetches the consensus IO public key used to encrypt contract messages.
    pub async fn tx_key(&self) -> Result<Vec<u8>, LcdError> {
        let url = format!("{}/registration/v1beta1/tx-key", self.base_url);
        let response = self.client.get(url).send().await?;
        let envelope: TxKeyEnvelope = check_status(response).await?.json().await?;
        BASE64
            .decode(envelope.key)
            .map_err(|e| LcdError::Decode(format!("tx key: {e}")))
    }

    /// Runs a smart query with an already-encrypted payload.
    ///
    /// Returns the still-encrypted `data` field as raw bytes. Contract errors
    /// surface as [`LcdError::Status`] with the (encrypted) gateway message.
    pub async fn query_contract(
        &self,
        contract_address: &str,
        encrypted_query: &[u8],
    ) -> Result<Vec<u8>, LcdError> {
        let url = format!(
            "{}/compute/v1beta1/query/{contract_address}",
            self.base_url
        );
        let response = self
            .client
            .get(url)
            .query(&[("query", BASE64.encode(encrypted_query))])
            .send()
            .await?;
        let envelope: QueryEnvelope = check_status(response).await?.json().await?;
        BASE64
            .decode(envelope.data)
            .map_err(|e| LcdError::Decode(format!("query data: {e}")))
    }

    /// Broadcasts signed `TxRaw` bytes in sync mode.
    ///
    /// The returned response only reflects `CheckTx`; a zero code means the
    /// tx entered the mempool, not that it executed.
    pub async fn broadcast_tx(&self, tx_bytes: &[u8]) -> Result<LcdTxResponse, LcdError> {
        let url = format!("{}/cosmos/tx/v1beta1/txs", self.base_url);
        let body = BroadcastRequest {
            tx_bytes: BASE64.encode(tx_bytes),
            mode: "BROADCAST_MODE_SYNC",
        };
        let response = self.client.post(url).json(&body).send().await?;
        let envelope: TxEnvelope = check_status(response).await?.json().await?;
        Ok(envelope.tx_response)
    }

    /// Looks up a transaction by hash, or `None` if it is not yet indexed.
    pub async fn get_tx(&self, hash: &str) -> Result<Option<LcdTxResponse>, LcdError> {
        let url = format!("{}/cosmos/tx/v1beta1/txs/{hash}", self.base_url);
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let envelope: TxEnvelope = check_status(response).await?.json().await?;
        Ok(Some(envelope.tx_response))
    }
}

/// Maps non-success responses to [`LcdError::Status`], keeping the gateway
/// `message` when the body carries one.
async fn check_status(response: Response) -> Result<Response, LcdError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GatewayError>(&body)
        .map(|e| e.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or(body);
    Err(LcdError::Status {
        status: status.as_u16(),
        message,
    })
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrNum<T> {
    Str(String),
    Num(T),
}

fn u64_from_str<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    match StrOrNum::<u64>::deserialize(d)? {
        StrOrNum::Str(s) if s.is_empty() => Ok(0),
        StrOrNum::Str(s) => s.parse().map_err(de::Error::custom),
        StrOrNum::Num(n) => Ok(n),
    }
}

fn u128_from_str<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
    match StrOrNum::<u64>::deserialize(d)? {
        StrOrNum::Str(s) => s.parse().map_err(de::Error::custom),
        StrOrNum::Num(n) => Ok(n as u128),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const ADDR: &str = "secret1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5a8chmq";

    async fn transport(server: &MockServer) -> LcdTransport {
        LcdTransport::new(&server.uri(), LcdConfig::default()).unwrap()
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let result = LcdTransport::new("grpc://localhost:9090", LcdConfig::default());
        assert!(matches!(result, Err(LcdError::InvalidEndpoint { .. })));
    }

    #[test]
    fn rejects_unparseable_endpoint() {
        let result = LcdTransport::new("not a url", LcdConfig::default());
        assert!(matches!(result, Err(LcdError::InvalidEndpoint { .. })));
    }

    #[test]
    fn builder_fills_defaults() {
        let config = LcdConfig::builder()
            .request_timeout(Duration::from_secs(5))
            .build();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn account_parses_string_numbers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/cosmos/auth/v1beta1/accounts/{ADDR}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "account": {
                    "@type": "/cosmos.auth.v1beta1.BaseAccount",
                    "address": ADDR,
                    "pub_key": null,
                    "account_number": "12",
                    "sequence": "3"
                }
            })))
            .mount(&server)
            .await;

        let account = transport(&server).await.account(ADDR).await.unwrap();
        assert_eq!(
            account,
            Some(AccountInfo {
                account_number: 12,
                sequence: 3
            })
        );
    }

    #[tokio::test]
    async fn unknown_account_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/cosmos/auth/v1beta1/accounts/{ADDR}")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": 5,
                "message": "account not found",
                "details": []
            })))
            .mount(&server)
            .await;

        assert_eq!(transport(&server).await.account(ADDR).await.unwrap(), None);
    }

    #[tokio::test]
    async fn balance_by_denom() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/cosmos/bank/v1beta1/balances/{ADDR}/by_denom")))
            .and(query_param("denom", "uscrt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "balance": { "denom": "uscrt", "amount": "100000000" }
            })))
            .mount(&server)
            .await;

        let balance = transport(&server).await.balance(ADDR, "uscrt").await.unwrap();
        assert_eq!(balance, 100_000_000);
    }

    #[tokio::test]
    async fn server_error_keeps_gateway_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/cosmos/bank/v1beta1/balances/{ADDR}/by_denom")))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "code": 13,
                "message": "node is syncing",
                "details": []
            })))
            .mount(&server)
            .await;

        let err = transport(&server)
            .await
            .balance(ADDR, "uscrt")
            .await
            .unwrap_err();
        match err {
            LcdError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "node is syncing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn code_hash_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compute/v1beta1/code_hash/by_code_id/7"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "code_hash": "abcdef" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/compute/v1beta1/code_hash/by_code_id/8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code_hash": "" })))
            .mount(&server)
            .await;

        let lcd = transport(&server).await;
        assert_eq!(
            lcd.code_hash_by_code_id(7).await.unwrap().as_deref(),
            Some("abcdef")
        );
        assert_eq!(lcd.code_hash_by_code_id(8).await.unwrap(), None);
    }

    #[tokio::test]
    async fn tx_key_is_base64_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/registration/v1beta1/tx-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "key": BASE64.encode([9u8; 32]) })),
            )
            .mount(&server)
            .await;

        assert_eq!(transport(&server).await.tx_key().await.unwrap(), vec![9u8; 32]);
    }

    #[tokio::test]
    async fn query_sends_base64_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/compute/v1beta1/query/{ADDR}")))
            .and(query_param("query", BASE64.encode(b"sealed")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": BASE64.encode(b"reply") })),
            )
            .mount(&server)
            .await;

        let data = transport(&server)
            .await
            .query_contract(ADDR, b"sealed")
            .await
            .unwrap();
        assert_eq!(data, b"reply");
    }

    #[tokio::test]
    async fn broadcast_posts_sync_mode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cosmos/tx/v1beta1/txs"))
            .and(body_partial_json(json!({
                "tx_bytes": BASE64.encode(b"tx"),
                "mode": "BROADCAST_MODE_SYNC"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tx_response": {
                    "height": "0",
                    "txhash": "ABC",
                    "code": 0,
                    "raw_log": "[]",
                    "gas_wanted": "0",
                    "gas_used": "0"
                }
            })))
            .mount(&server)
            .await;

        let response = transport(&server).await.broadcast_tx(b"tx").await.unwrap();
        assert_eq!(response.txhash, "ABC");
        assert_eq!(response.code, 0);
    }

    #[tokio::test]
    async fn get_tx_parses_logs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cosmos/tx/v1beta1/txs/ABC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tx": {},
                "tx_response": {
                    "height": "42",
                    "txhash": "ABC",
                    "code": 0,
                    "raw_log": "",
                    "logs": [{
                        "msg_index": 0,
                        "log": "",
                        "events": [{
                            "type": "message",
                            "attributes": [
                                { "key": "action", "value": "/secret.compute.v1beta1.MsgStoreCode" },
                                { "key": "code_id", "value": "7" }
                            ]
                        }]
                    }],
                    "gas_wanted": "5000000",
                    "gas_used": "1234567",
                    "events": []
                }
            })))
            .mount(&server)
            .await;

        let tx = transport(&server).await.get_tx("ABC").await.unwrap().unwrap();
        assert_eq!(tx.height, 42);
        assert_eq!(tx.gas_used, 1_234_567);
        assert_eq!(tx.logs[0].events[0].kind, "message");
        assert_eq!(tx.logs[0].events[0].attributes[1].value, "7");
    }

    #[tokio::test]
    async fn pending_tx_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cosmos/tx/v1beta1/txs/PENDING"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": 5,
                "message": "tx not found: PENDING",
                "details": []
            })))
            .mount(&server)
            .await;

        assert_eq!(transport(&server).await.get_tx("PENDING").await.unwrap(), None);
    }
}
