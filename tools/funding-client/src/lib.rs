//! Faucet client for Secret Network test chains.
//!
//! Talks to the faucet bundled with the `localsecret` image:
//! `GET {base}/faucet?address=<bech32>`. The response body is ignored;
//! a 2xx status means the faucet accepted the request.

use std::error::Error;
use std::time::Duration;

use config::NetworkConfig;
use config::constants::FAUCET_PATH;
use reqwest::Client;
use sdk::faucet::Faucet;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct FundingClient {
    client: Client,
    base_url: String,
}

impl FundingClient {
    /// A client for the faucet at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// A client for the faucet configured in `config`.
    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(config.faucet_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Asks the faucet to fund `address`.
    pub async fn request_funds(&self, address: &str) -> reqwest::Result<()> {
        self.client
            .get(format!("{}{FAUCET_PATH}", self.base_url))
            .query(&[("address", address)])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

impl Faucet for FundingClient {
    async fn request_funds(&self, address: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(faucet = %self.base_url, address, "faucet request");
        FundingClient::request_funds(self, address).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const ADDRESS: &str = "secret1gkle2qetd47g4qlruxu8kx4m97875t66qsgr0p";

    #[tokio::test]
    async fn request_funds_sends_address_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/faucet"))
            .and(query_param("address", ADDRESS))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = FundingClient::new(format!("{}/", server.uri()));
        client.request_funds(ADDRESS).await.unwrap();
    }

    #[tokio::test]
    async fn error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/faucet"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = FundingClient::new(server.uri());
        let err = client.request_funds(ADDRESS).await.unwrap_err();
        assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    }

    #[tokio::test]
    async fn faucet_trait_reports_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/faucet"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = FundingClient::new(server.uri());
        assert!(Faucet::request_funds(&client, ADDRESS).await.is_err());
    }

    #[test]
    fn from_config_uses_faucet_url() {
        let config = NetworkConfig::localsecret().with_faucet_url("http://faucet:5000/");
        assert_eq!(FundingClient::from_config(&config).base_url(), "http://faucet:5000");
    }

    #[tokio::test]
    #[ignore = "requires a running localsecret faucet"]
    async fn live_faucet_accepts_request() {
        let client = FundingClient::from_config(&NetworkConfig::from_env());
        client.request_funds(ADDRESS).await.unwrap();
    }
}
