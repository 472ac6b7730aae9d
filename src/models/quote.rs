use ethers::types::{Address, U256};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use crate::{
    constants::WEI_DECIMALS,
    error::{Result, SdkError},
    integrations::price_oracle::PriceOracle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20Approval {
    pub token: Address,
    pub spender: Address,
    pub amount: U256,
}

/// Costs of minting `quantity` tokens under one sale strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintCosts {
    pub quantity: u64,
    /// Native value per token, creator price plus protocol fee.
    pub native_price_per_token: U256,
    pub mint_fee_total: U256,
    /// Creator revenue, denominated in `purchase_currency` when set.
    pub purchase_cost_total: U256,
    pub purchase_currency: Option<Address>,
    /// Native value to attach to the mint transaction.
    pub total_cost: U256,
    pub erc20_approval: Option<Erc20Approval>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountPair {
    pub per_token: U256,
    pub total: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdAmounts {
    pub per_token: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub wei: AmountPair,
    pub sparks: AmountPair,
}

impl PriceQuote {
    pub fn from_costs(costs: &MintCosts, spark_value: U256) -> Result<Self> {
        let wei = AmountPair {
            per_token: costs.native_price_per_token,
            total: costs.total_cost,
        };
        // Truncating division; a partial spark is never rounded up.
        let to_sparks = |amount: U256| {
            amount
                .checked_div(spark_value)
                .ok_or_else(|| SdkError::Config("spark value is zero".to_string()))
        };
        Ok(Self {
            wei,
            sparks: AmountPair {
                per_token: to_sparks(wei.per_token)?,
                total: to_sparks(wei.total)?,
            },
        })
    }

    /// USD value of the quote at the oracle's current ETH price. Leaves the
    /// quote untouched, so it can be called any number of times.
    pub async fn usdc(&self, oracle: &dyn PriceOracle) -> Result<UsdAmounts> {
        let eth_usd = oracle.eth_usd().await?;
        Ok(UsdAmounts {
            per_token: wei_to_usd(self.wei.per_token, eth_usd)?,
            total: wei_to_usd(self.wei.total, eth_usd)?,
        })
    }
}

fn wei_to_usd(wei: U256, eth_usd: Decimal) -> Result<Decimal> {
    let mut eth = Decimal::from_str(&wei.to_string())
        .map_err(|_| SdkError::AmountOverflow("usd value"))?;
    eth.set_scale(WEI_DECIMALS)
        .map_err(|_| SdkError::AmountOverflow("usd value"))?;
    eth.checked_mul(eth_usd)
        .map(|usd| usd.round_dp(2))
        .ok_or(SdkError::AmountOverflow("usd value"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FixedOracle {
        price: Decimal,
        calls: AtomicU32,
    }

    #[async_trait]
    impl PriceOracle for FixedOracle {
        async fn eth_usd(&self) -> Result<Decimal> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.price)
        }
    }

    fn costs(per_token: u64, quantity: u64) -> MintCosts {
        MintCosts {
            quantity,
            native_price_per_token: U256::from(per_token),
            mint_fee_total: U256::zero(),
            purchase_cost_total: U256::zero(),
            purchase_currency: None,
            total_cost: U256::from(per_token) * U256::from(quantity),
            erc20_approval: None,
        }
    }

    #[test]
    fn sparks_truncate_partial_units() {
        let quote =
            PriceQuote::from_costs(&costs(1_500, 3), U256::from(1_000u64)).expect("quote");
        assert_eq!(quote.wei.total, U256::from(4_500u64));
        assert_eq!(quote.sparks.per_token, U256::from(1u64));
        assert_eq!(quote.sparks.total, U256::from(4u64));
    }

    #[test]
    fn zero_spark_value_is_rejected() {
        assert!(PriceQuote::from_costs(&costs(1, 1), U256::zero()).is_err());
    }

    #[tokio::test]
    async fn usdc_converts_wei_and_is_repeatable() {
        let oracle = FixedOracle {
            price: Decimal::from(2_000),
            calls: AtomicU32::new(0),
        };
        // 0.000111 ETH per token, 10 tokens
        let quote = PriceQuote::from_costs(
            &costs(111_000_000_000_000, 10),
            U256::from(1_000_000_000_000u64),
        )
        .unwrap();

        let first = quote.usdc(&oracle).await.unwrap();
        let second = quote.usdc(&oracle).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.per_token, Decimal::from_str("0.22").unwrap());
        assert_eq!(first.total, Decimal::from_str("2.22").unwrap());
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
        assert_eq!(quote.sparks.total, U256::from(1_110u64));
    }
}
