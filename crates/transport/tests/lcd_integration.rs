//! Integration tests for the LCD transport against a live node.
//!
//! These tests talk to a running `localsecret` node and are marked
//! `#[ignore]` because they require network access.
//!
//! Run with:
//!
//! ```bash
//! SECRET_LCD_URL=http://localhost:1317 \
//!   cargo test -p transport --test lcd_integration -- --ignored --nocapture
//! ```

use sdk_core::SecretAddress;
use transport::{LcdConfig, LcdTransport};

const DEFAULT_LCD_URL: &str = "http://localhost:1317";

fn make_transport() -> LcdTransport {
    let url = std::env::var("SECRET_LCD_URL").unwrap_or_else(|_| DEFAULT_LCD_URL.to_string());
    LcdTransport::new(&url, LcdConfig::default()).expect("valid LCD url")
}

/// An address nobody has ever funded.
fn fresh_address() -> String {
    let mut id = [0u8; 20];
    id[..8].copy_from_slice(&std::process::id().to_be_bytes().repeat(2));
    SecretAddress::from_account_id(id).to_string()
}

#[tokio::test]
#[ignore = "requires a running localsecret node"]
async fn tx_key_is_x25519_public_key() {
    let key = make_transport().tx_key().await.expect("tx key");
    assert_eq!(key.len(), 32);
}

#[tokio::test]
#[ignore = "requires a running localsecret node"]
async fn fresh_address_has_no_account_and_zero_balance() {
    let lcd = make_transport();
    let address = fresh_address();

    assert_eq!(lcd.account(&address).await.expect("account query"), None);
    assert_eq!(lcd.balance(&address, "uscrt").await.expect("balance"), 0);
}

#[tokio::test]
#[ignore = "requires a running localsecret node"]
async fn unknown_code_id_has_no_hash() {
    let hash = make_transport()
        .code_hash_by_code_id(u64::MAX)
        .await
        .unwrap_or(None);
    assert_eq!(hash, None);
}
