//! Rock-paper-scissors contract integration run.
//!
//! Creates two fresh wallets, funds both from the faucet, deploys the
//! contract and runs every scenario against it. Exits non-zero on the first
//! failure.
//!
//! # Configuration
//!
//! Network endpoints come from `SECRET_LCD_URL`, `SECRET_CHAIN_ID` and
//! `SECRET_FAUCET_URL`; the contract from `CONTRACT_PATH`. Without them
//! the run targets a local `localsecret` node.
//!
//! ```bash
//! CONTRACT_PATH=contract/rps.wasm.gz RUST_LOG=info cargo run -p rps-tests
//! ```

use std::error::Error;

use tracing_subscriber::EnvFilter;

use config::NetworkConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = NetworkConfig::from_env();
    let contract_path = config::contract_path_from_env();
    tracing::info!(
        lcd_url = %config.lcd_url,
        chain_id = %config.chain_id,
        contract = %contract_path.display(),
        "rps-tests starting"
    );

    if let Err(e) = scenarios::rps::run(&config, &contract_path).await {
        tracing::error!(error = %e, "rps scenarios failed");
        return Err(e.into());
    }

    tracing::info!("all rps scenarios passed");
    Ok(())
}
