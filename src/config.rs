use ethers::types::U256;
use serde::Serialize;
use std::env;
use std::time::Duration;
use url::Url;

use crate::constants::{
    DEFAULT_ALLOWLIST_API_URL, DEFAULT_CHAIN_ID, DEFAULT_MARKET_COUNTDOWN_SECS,
    DEFAULT_MINIMUM_MINTS_FOR_COUNTDOWN, DEFAULT_PRICE_API_URL, DEFAULT_RETRY_BASE_DELAY_MS,
    DEFAULT_RETRY_MAX_ATTEMPTS, MARKET_REWARD_PER_MINT_WEI, SPARK_VALUE_WEI,
};
use crate::utils::RetryPolicy;

/// Fee and market constants for one chain / fee regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolConstants {
    pub market_reward_per_mint: U256,
    pub default_minimum_mints_for_countdown: u64,
    pub default_market_countdown: u64,
    pub spark_value: U256,
}

impl Default for ProtocolConstants {
    fn default() -> Self {
        Self {
            market_reward_per_mint: U256::from(MARKET_REWARD_PER_MINT_WEI),
            default_minimum_mints_for_countdown: DEFAULT_MINIMUM_MINTS_FOR_COUNTDOWN,
            default_market_countdown: DEFAULT_MARKET_COUNTDOWN_SECS,
            spark_value: U256::from(SPARK_VALUE_WEI),
        }
    }
}

impl ProtocolConstants {
    /// Minimum market value used when the creator gives neither a mint count
    /// nor an explicit value.
    pub fn default_minimum_market_eth(&self) -> U256 {
        self.market_reward_per_mint
            .saturating_mul(U256::from(self.default_minimum_mints_for_countdown))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub chain_id: u64,

    // External services
    pub subgraph_url: String,
    pub allowlist_api_url: String,
    pub price_api_url: String,

    // Query layer retries
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,

    pub protocol: ProtocolConstants,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut protocol = ProtocolConstants::default();
        if let Ok(raw) = env::var("MARKET_REWARD_PER_MINT_WEI") {
            protocol.market_reward_per_mint = U256::from_dec_str(raw.trim())
                .map_err(|e| anyhow::anyhow!("MARKET_REWARD_PER_MINT_WEI: {e}"))?;
        }
        if let Ok(raw) = env::var("SPARK_VALUE_WEI") {
            protocol.spark_value = U256::from_dec_str(raw.trim())
                .map_err(|e| anyhow::anyhow!("SPARK_VALUE_WEI: {e}"))?;
        }

        Ok(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| DEFAULT_CHAIN_ID.to_string())
                .parse()?,

            subgraph_url: env::var("SUBGRAPH_URL")?,
            allowlist_api_url: env::var("ALLOWLIST_API_URL")
                .unwrap_or_else(|_| DEFAULT_ALLOWLIST_API_URL.to_string()),
            price_api_url: env::var("PRICE_API_URL")
                .unwrap_or_else(|_| DEFAULT_PRICE_API_URL.to_string()),

            retry_max_attempts: env::var("RETRY_MAX_ATTEMPTS")
                .unwrap_or_else(|_| DEFAULT_RETRY_MAX_ATTEMPTS.to_string())
                .parse()?,
            retry_base_delay_ms: env::var("RETRY_BASE_DELAY_MS")
                .unwrap_or_else(|_| DEFAULT_RETRY_BASE_DELAY_MS.to_string())
                .parse()?,

            protocol,
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("SUBGRAPH_URL", &self.subgraph_url),
            ("ALLOWLIST_API_URL", &self.allowlist_api_url),
            ("PRICE_API_URL", &self.price_api_url),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{name} is empty");
            }
            let url = Url::parse(value).map_err(|e| anyhow::anyhow!("{name} is invalid: {e}"))?;
            if url.scheme() != "https" {
                tracing::warn!("{} does not use https: {}", name, value);
            }
        }
        if self.retry_max_attempts == 0 {
            anyhow::bail!("RETRY_MAX_ATTEMPTS must be at least 1");
        }
        if self.protocol.market_reward_per_mint.is_zero() {
            anyhow::bail!("MARKET_REWARD_PER_MINT_WEI must be greater than zero");
        }
        if self.protocol.spark_value.is_zero() {
            anyhow::bail!("SPARK_VALUE_WEI must be greater than zero");
        }
        Ok(())
    }

    pub fn is_testnet(&self) -> bool {
        let env = self.environment.to_ascii_lowercase();
        env.contains("testnet") || env.contains("sepolia") || env == "development"
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}
