use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::currency::{RateProvider, RateSnapshot, RateTable};

/// Latest rates from the exchangerate-api.com `v4/latest` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    base_currency: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, base_currency: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            base_currency: base_currency.to_uppercase(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: Option<String>,
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateFetch",
        skip(self),
        fields(base = %self.base_currency)
    )]
    async fn fetch_rates(&self) -> Result<RateSnapshot> {
        let base = &self.base_currency;
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(concat!("fxconv/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        if let Some(returned) = &data.base {
            if !returned.eq_ignore_ascii_case(base) {
                return Err(anyhow!(
                    "Unexpected base currency in response: expected {}, got {}",
                    base,
                    returned
                ));
            }
        }

        let table = RateTable::new(base, data.rates);
        if table.is_empty() {
            return Err(anyhow!("No rate data found for base currency: {}", base));
        }

        debug!(rates = table.len(), "Received exchange rates");
        Ok(RateSnapshot::new(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "provider": "https://www.exchangerate-api.com",
            "base": "USD",
            "date": "2025-04-01",
            "time_last_updated": 1743465601,
            "rates": {
                "USD": 1,
                "EUR": 0.925,
                "PKR": 280.35,
                "JPY": 149.9
            }
        }"#;
        let mock_server = create_mock_server(200, mock_response).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), "USD");
        let snapshot = provider.fetch_rates().await.unwrap();
        assert_eq!(snapshot.table.base(), "USD");
        assert_eq!(snapshot.table.len(), 4);
        assert_eq!(snapshot.table.rate("USD"), Some(1.0));
        assert_eq!(snapshot.table.rate("EUR"), Some(0.925));
        assert_eq!(snapshot.table.rate("PKR"), Some(280.35));
    }

    #[tokio::test]
    async fn test_response_without_base_field() {
        let mock_server = create_mock_server(200, r#"{"rates": {"EUR": 0.9}}"#).await;

        let provider = ExchangeRateApiProvider::new(&format!("{}/", mock_server.uri()), "usd");
        let snapshot = provider.fetch_rates().await.unwrap();
        assert_eq!(snapshot.table.rate("EUR"), Some(0.9));
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server(500, "").await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), "USD");
        let result = provider.fetch_rates().await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for base currency: USD"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server(200, r#"{"result": "error"}"#).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), "USD");
        let result = provider.fetch_rates().await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for USD")
        );
    }

    #[tokio::test]
    async fn test_empty_rates() {
        let mock_server = create_mock_server(200, r#"{"base": "USD", "rates": {}}"#).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), "USD");
        let result = provider.fetch_rates().await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No rate data found for base currency: USD"
        );
    }

    #[tokio::test]
    async fn test_mismatched_base() {
        let mock_server =
            create_mock_server(200, r#"{"base": "EUR", "rates": {"USD": 1.08}}"#).await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), "USD");
        let result = provider.fetch_rates().await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unexpected base currency")
        );
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let provider = ExchangeRateApiProvider::new("http://127.0.0.1:9", "USD");
        let result = provider.fetch_rates().await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .starts_with("Request error:")
        );
    }
}
