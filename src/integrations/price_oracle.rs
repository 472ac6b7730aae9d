use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::time::{timeout, Duration};
use url::Url;

use crate::{
    constants::HTTP_TIMEOUT_MS,
    error::{Result, SdkError},
    utils::{with_retries, RetryPolicy},
};

// Sane USD bounds for ETH; anything outside is treated as a bad feed.
const ETH_USD_MIN: i64 = 10;
const ETH_USD_MAX: i64 = 100_000;

/// Source of the ETH/USD rate used for display values.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn eth_usd(&self) -> Result<Decimal>;
}

/// Rejects non-positive or out-of-range prices.
pub fn sanitize_eth_usd(value: Decimal) -> Option<Decimal> {
    if value < Decimal::from(ETH_USD_MIN) || value > Decimal::from(ETH_USD_MAX) {
        return None;
    }
    Some(value)
}

#[derive(Debug, Deserialize)]
struct SimplePriceResponse(HashMap<String, HashMap<String, Decimal>>);

#[derive(Clone, Debug)]
pub struct CoinGeckoOracle {
    api_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl CoinGeckoOracle {
    pub fn new(api_url: String, retry: RetryPolicy) -> Self {
        Self {
            api_url,
            client: Client::new(),
            retry,
        }
    }

    fn price_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/simple/price",
            self.api_url.trim_end_matches('/')
        ))
        .map_err(|e| SdkError::Config(format!("Invalid price API url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("ids", "ethereum")
            .append_pair("vs_currencies", "usd");
        Ok(url)
    }

    async fn fetch_once(&self, url: &Url) -> Result<Decimal> {
        let response = timeout(
            Duration::from_millis(HTTP_TIMEOUT_MS),
            self.client.get(url.clone()).send(),
        )
        .await
        .map_err(|_| SdkError::ExternalApi("price API timeout".to_string()))??;

        let status = response.status();
        if !status.is_success() {
            return Err(SdkError::ExternalApi(format!("price API returned {}", status)));
        }

        let body: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| SdkError::ExternalApi(e.to_string()))?;
        extract_eth_usd(body)
    }
}

fn extract_eth_usd(body: SimplePriceResponse) -> Result<Decimal> {
    let price = body
        .0
        .get("ethereum")
        .and_then(|quotes| quotes.get("usd"))
        .copied()
        .ok_or_else(|| SdkError::ExternalApi("price API response has no ethereum.usd".to_string()))?;
    sanitize_eth_usd(price)
        .ok_or_else(|| SdkError::ExternalApi(format!("ETH price {} outside sane range", price)))
}

#[async_trait]
impl PriceOracle for CoinGeckoOracle {
    async fn eth_usd(&self) -> Result<Decimal> {
        let url = self.price_url()?;
        let url_ref = &url;
        let price = with_retries(self.retry, "ETH/USD price fetch", move |_| {
            self.fetch_once(url_ref)
        })
        .await?;
        tracing::debug!("ETH/USD price: {}", price);
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sanitize_rejects_out_of_range_prices() {
        assert!(sanitize_eth_usd(Decimal::ZERO).is_none());
        assert!(sanitize_eth_usd(Decimal::from(1_000_000)).is_none());
        assert_eq!(
            sanitize_eth_usd(Decimal::from(3_100)),
            Some(Decimal::from(3_100))
        );
    }

    #[test]
    fn price_url_has_expected_query() {
        let oracle = CoinGeckoOracle::new(
            "https://api.coingecko.com/api/v3/".to_string(),
            RetryPolicy::default(),
        );
        let url = oracle.price_url().unwrap();
        assert_eq!(url.path(), "/api/v3/simple/price");
        assert_eq!(url.query(), Some("ids=ethereum&vs_currencies=usd"));
    }

    #[test]
    fn extracts_price_from_simple_price_body() {
        let body: SimplePriceResponse =
            serde_json::from_str(r#"{"ethereum":{"usd":3456.78}}"#).unwrap();
        assert_eq!(
            extract_eth_usd(body).unwrap(),
            Decimal::from_str("3456.78").unwrap()
        );
    }

    #[test]
    fn missing_or_absurd_price_is_an_error() {
        let body: SimplePriceResponse = serde_json::from_str(r#"{"bitcoin":{"usd":1}}"#).unwrap();
        assert!(extract_eth_usd(body).is_err());

        let body: SimplePriceResponse = serde_json::from_str(r#"{"ethereum":{"usd":0.5}}"#).unwrap();
        assert!(extract_eth_usd(body).is_err());
    }
}
