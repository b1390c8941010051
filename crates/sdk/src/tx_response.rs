//! Decoded transaction results.
//!
//! A [`TxResponse`] carries the outcome of a delivered transaction:
//!
//! - `json_log` -- one [`TxLog`] per message, each an ordered list of typed
//!   [`Event`]s with ordered key/value [`Attribute`]s
//! - [`TxResponse::array_log`] -- the same data flattened into
//!   (`msg`, `type`, `key`, `value`) rows
//!
//! Chains that no longer populate per-message logs only return flat ABCI
//! events. Those are folded into a single batch so that "first batch"
//! lookups keep working.

use serde::Serialize;
use transport::{LcdEvent, LcdTxResponse};

/// Outcome of a transaction, as delivered (or rejected) by the chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TxResponse {
    pub height: u64,
    pub tx_hash: String,
    /// Zero on success.
    pub code: u32,
    pub codespace: String,
    pub raw_log: String,
    pub json_log: Vec<TxLog>,
    pub gas_wanted: u64,
    pub gas_used: u64,
}

/// Events emitted by one message of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TxLog {
    pub msg_index: u32,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// One row of the flattened log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayLogEntry<'a> {
    pub msg: u32,
    pub kind: &'a str,
    pub key: &'a str,
    pub value: &'a str,
}

impl TxResponse {
    /// `true` if the chain accepted and executed the transaction.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// The first message's log batch, if any.
    pub fn first_log(&self) -> Option<&TxLog> {
        self.json_log.first()
    }

    /// Flattens `json_log` into (`msg`, `type`, `key`, `value`) rows, in order.
    pub fn array_log(&self) -> Vec<ArrayLogEntry<'_>> {
        self.json_log
            .iter()
            .flat_map(|log| {
                log.events.iter().flat_map(move |event| {
                    event.attributes.iter().map(move |attr| ArrayLogEntry {
                        msg: log.msg_index,
                        kind: &event.kind,
                        key: &attr.key,
                        value: &attr.value,
                    })
                })
            })
            .collect()
    }

    /// Applies `f` to every attribute of every event whose type starts with
    /// `wasm`, i.e. the ones a contract emitted.
    pub(crate) fn for_each_contract_attribute(&mut self, mut f: impl FnMut(&mut Attribute)) {
        for log in &mut self.json_log {
            for event in log.events.iter_mut().filter(|e| e.kind.starts_with("wasm")) {
                event.attributes.iter_mut().for_each(&mut f);
            }
        }
    }

    /// JSON rendering for error messages.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

impl From<LcdTxResponse> for TxResponse {
    fn from(lcd: LcdTxResponse) -> Self {
        let json_log = if lcd.logs.is_empty() {
            if lcd.events.is_empty() {
                Vec::new()
            } else {
                vec![TxLog {
                    msg_index: 0,
                    events: lcd.events.into_iter().map(Event::from).collect(),
                }]
            }
        } else {
            lcd.logs
                .into_iter()
                .map(|log| TxLog {
                    msg_index: log.msg_index,
                    events: log.events.into_iter().map(Event::from).collect(),
                })
                .collect()
        };

        Self {
            height: lcd.height,
            tx_hash: lcd.txhash,
            code: lcd.code,
            codespace: lcd.codespace,
            raw_log: lcd.raw_log,
            json_log,
            gas_wanted: lcd.gas_wanted,
            gas_used: lcd.gas_used,
        }
    }
}

impl From<LcdEvent> for Event {
    fn from(event: LcdEvent) -> Self {
        Self {
            kind: event.kind,
            attributes: event
                .attributes
                .into_iter()
                .map(|a| Attribute {
                    key: a.key,
                    value: a.value,
                })
                .collect(),
        }
    }
}

impl Event {
    /// Builds an event from `(key, value)` pairs.
    pub fn new(kind: impl Into<String>, attributes: &[(&str, &str)]) -> Self {
        Self {
            kind: kind.into(),
            attributes: attributes
                .iter()
                .map(|(k, v)| Attribute {
                    key: (*k).to_string(),
                    value: (*v).to_string(),
                })
                .collect(),
        }
    }
}
