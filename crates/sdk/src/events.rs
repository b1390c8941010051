//! Field extraction from transaction logs.
//!
//! Two styles are offered:
//!
//! - Ad-hoc lookups: [`find_event_attribute`] / [`require_event_attribute`]
//!   over the first log batch, and [`find_array_log`] over the flattened log.
//!   Event types and keys compare case-insensitively.
//! - Typed decoding: implement [`FromEvent`] for a struct describing one
//!   event kind and call [`decode_event`].
//!
//! Only the first batch (`json_log[0]`) is scanned by the batch lookups.
//! The harness submits one message per transaction, so every field it needs
//! lives there.

use crate::SdkError;
use crate::tx_response::{Attribute, Event, TxResponse};

/// Finds `key` on the first event of type `event_type` in the first batch
/// that carries it.
pub fn find_event_attribute<'a>(
    tx: &'a TxResponse,
    event_type: &str,
    key: &str,
) -> Option<&'a str> {
    tx.first_log()?
        .events
        .iter()
        .filter(|e| e.kind.eq_ignore_ascii_case(event_type))
        .find_map(|e| find_attribute(&e.attributes, key))
}

/// Like [`find_event_attribute`], but absence is an error.
///
/// # Errors
///
/// Returns [`SdkError::MissingField`] naming the event and key.
pub fn require_event_attribute<'a>(
    tx: &'a TxResponse,
    event_type: &str,
    key: &str,
) -> Result<&'a str, SdkError> {
    find_event_attribute(tx, event_type, key).ok_or_else(|| missing(event_type, key))
}

/// Finds `key` (exact match) on the first event of the first batch. Later
/// events are not consulted.
pub fn find_first_event_attribute<'a>(tx: &'a TxResponse, key: &str) -> Option<&'a str> {
    tx.first_log()?
        .events
        .first()?
        .attributes
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.as_str())
}

/// Attributes of the first event of type `event_type` in the first batch.
pub fn event_attributes<'a>(tx: &'a TxResponse, event_type: &str) -> Option<&'a [Attribute]> {
    tx.first_log()?
        .events
        .iter()
        .find(|e| e.kind.eq_ignore_ascii_case(event_type))
        .map(|e| e.attributes.as_slice())
}

/// Finds (`event_type`, `key`) in the flattened log of all batches.
pub fn find_array_log<'a>(tx: &'a TxResponse, event_type: &str, key: &str) -> Option<&'a str> {
    tx.array_log()
        .into_iter()
        .find(|row| row.kind == event_type && row.key == key)
        .map(|row| row.value)
}

/// Like [`find_array_log`], but absence is an error.
///
/// # Errors
///
/// Returns [`SdkError::MissingField`] naming the event and key.
pub fn require_array_log<'a>(
    tx: &'a TxResponse,
    event_type: &str,
    key: &str,
) -> Result<&'a str, SdkError> {
    find_array_log(tx, event_type, key).ok_or_else(|| missing(event_type, key))
}

fn find_attribute<'a>(attributes: &'a [Attribute], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.key.eq_ignore_ascii_case(key))
        .map(|a| a.value.as_str())
}

fn missing(event_type: &str, key: &str) -> SdkError {
    SdkError::MissingField {
        event: event_type.to_string(),
        key: key.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Typed decoding
// ---------------------------------------------------------------------------

/// A struct decoded from one event kind.
pub trait FromEvent: Sized {
    /// Event type as it appears on chain, e.g. `wasm-new_rps_game`.
    const EVENT_TYPE: &'static str;

    /// Decodes the event's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::MissingField`] or [`SdkError::InvalidPayload`]
    /// when the event does not match the declared shape.
    fn from_event(event: &Event) -> Result<Self, SdkError>;
}

/// Decodes the first `T::EVENT_TYPE` event of the first batch.
///
/// # Errors
///
/// Returns [`SdkError::MissingField`] if no such event exists, or whatever
/// [`FromEvent::from_event`] reports.
pub fn decode_event<T: FromEvent>(tx: &TxResponse) -> Result<T, SdkError> {
    let event = tx
        .first_log()
        .and_then(|log| {
            log.events
                .iter()
                .find(|e| e.kind.eq_ignore_ascii_case(T::EVENT_TYPE))
        })
        .ok_or_else(|| missing(T::EVENT_TYPE, "*"))?;
    T::from_event(event)
}

/// Required attribute of a single event, for [`FromEvent`] impls.
///
/// # Errors
///
/// Returns [`SdkError::MissingField`] if the key is absent.
pub fn required_attribute<'a>(event: &'a Event, key: &str) -> Result<&'a str, SdkError> {
    find_attribute(&event.attributes, key).ok_or_else(|| missing(&event.kind, key))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx_response::TxLog;

    fn tx(batches: Vec<Vec<Event>>) -> TxResponse {
        TxResponse {
            json_log: batches
                .into_iter()
                .enumerate()
                .map(|(i, events)| TxLog {
                    msg_index: i as u32,
                    events,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn case_insensitive_lookup() {
        let tx = tx(vec![vec![Event::new(
            "WASM-New_RPS_Game",
            &[("Game_Code", "QTEBERJH")],
        )]]);
        assert_eq!(
            find_event_attribute(&tx, "wasm-new_rps_game", "game_code"),
            Some("QTEBERJH")
        );
    }

    #[test]
    fn missing_attribute_is_typed_error() {
        let tx = tx(vec![vec![Event::new("wasm-new_rps_game", &[])]]);
        match require_event_attribute(&tx, "wasm-new_rps_game", "game_code") {
            Err(SdkError::MissingField { event, key }) => {
                assert_eq!(event, "wasm-new_rps_game");
                assert_eq!(key, "game_code");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn only_first_batch_is_scanned() {
        let tx = tx(vec![
            vec![Event::new("message", &[("action", "x")])],
            vec![Event::new("message", &[("code_id", "5")])],
        ]);
        assert_eq!(find_first_event_attribute(&tx, "code_id"), None);
        assert_eq!(find_array_log(&tx, "message", "code_id"), Some("5"));
    }

    #[test]
    fn empty_log_finds_nothing() {
        let tx = TxResponse::default();
        assert_eq!(find_event_attribute(&tx, "message", "code_id"), None);
        assert!(event_attributes(&tx, "message").is_none());
    }

    #[test]
    fn first_event_lookup_ignores_later_events() {
        let tx = tx(vec![vec![
            Event::new("message", &[("action", "/secret.compute.v1beta1.MsgStoreCode")]),
            Event::new("store_code", &[("code_id", "12")]),
        ]]);
        assert_eq!(find_first_event_attribute(&tx, "code_id"), None);
    }

    #[test]
    fn first_event_lookup_matches_key_exactly() {
        let tx = tx(vec![vec![Event::new(
            "message",
            &[("action", "store"), ("Code_Id", "3"), ("code_id", "4")],
        )]]);
        assert_eq!(find_first_event_attribute(&tx, "code_id"), Some("4"));
    }

    #[test]
    fn array_log_lookup_spans_batches_in_order() {
        let tx = tx(vec![
            vec![Event::new("wasm", &[("contract_address", "secret1first")])],
            vec![Event::new("message", &[("contract_address", "secret1second")])],
        ]);
        assert_eq!(
            find_array_log(&tx, "message", "contract_address"),
            Some("secret1second")
        );
    }

    #[test]
    fn array_log_requires_exact_type() {
        let tx = tx(vec![vec![Event::new(
            "message",
            &[("contract_address", "secret1abc")],
        )]]);
        assert_eq!(
            require_array_log(&tx, "message", "contract_address").unwrap(),
            "secret1abc"
        );
        assert!(require_array_log(&tx, "wasm", "contract_address").is_err());
    }

    struct Transfer {
        amount: u64,
    }

    impl FromEvent for Transfer {
        const EVENT_TYPE: &'static str = "transfer";

        fn from_event(event: &Event) -> Result<Self, SdkError> {
            let raw = required_attribute(event, "amount")?;
            let amount = raw
                .trim_end_matches("uscrt")
                .parse()
                .map_err(|_| SdkError::InvalidPayload(raw.to_string()))?;
            Ok(Self { amount })
        }
    }

    #[test]
    fn typed_decoding() {
        let tx = tx(vec![vec![Event::new("transfer", &[("amount", "250uscrt")])]]);
        assert_eq!(decode_event::<Transfer>(&tx).unwrap().amount, 250);

        let empty = tx_with_no_transfer();
        assert!(matches!(
            decode_event::<Transfer>(&empty),
            Err(SdkError::MissingField { .. })
        ));
    }

    fn tx_with_no_transfer() -> TxResponse {
        tx(vec![vec![Event::new("message", &[])]])
    }
}
