use ethers::types::{Address, H256, U256};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::SdkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SaleKind {
    FixedPrice,
    Allowlist,
    Erc20,
    Timed,
}

impl SaleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FixedPrice => "fixedPrice",
            Self::Allowlist => "allowlist",
            Self::Erc20 => "erc20",
            Self::Timed => "timed",
        }
    }
}

impl fmt::Display for SaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaleKind {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fixedPrice" | "fixed-price" => Ok(Self::FixedPrice),
            "allowlist" => Ok(Self::Allowlist),
            "erc20" => Ok(Self::Erc20),
            "timed" => Ok(Self::Timed),
            other => Err(SdkError::UnknownSaleType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedPriceSale {
    pub minter: Address,
    pub price_per_token: U256,
    /// Zero means unlimited.
    pub max_tokens_per_address: u64,
    pub sale_start: u64,
    pub sale_end: u64,
    pub mint_fee_per_quantity: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20Sale {
    pub minter: Address,
    pub currency: Address,
    pub price_per_token: U256,
    pub max_tokens_per_address: u64,
    pub sale_start: u64,
    pub sale_end: u64,
}

impl Erc20Sale {
    /// ERC-20 sales collect their fee in the ERC-20, never natively.
    pub fn mint_fee_per_quantity(&self) -> U256 {
        U256::zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowlistSale {
    pub minter: Address,
    pub merkle_root: H256,
    pub sale_start: u64,
    pub sale_end: u64,
    pub mint_fee_per_quantity: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedSale {
    pub minter: Address,
    pub mint_fee: U256,
    pub sale_start: u64,
    /// `None` until the market countdown has started.
    pub sale_end: Option<u64>,
    pub erc20_z: Address,
    pub pool: Address,
    pub secondary_activated: bool,
    pub market_countdown: Option<u64>,
    pub minimum_market_eth: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatus {
    pub countdown_started: bool,
    pub secondary_activated: bool,
    pub market_countdown: Option<u64>,
    pub minimum_market_eth: Option<U256>,
    pub erc20_z: Address,
    pub pool: Address,
}

impl TimedSale {
    pub fn market_status(&self) -> MarketStatus {
        MarketStatus {
            countdown_started: self.sale_end.is_some(),
            secondary_activated: self.secondary_activated,
            market_countdown: self.market_countdown,
            minimum_market_eth: self.minimum_market_eth,
            erc20_z: self.erc20_z,
            pool: self.pool,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "saleType", rename_all = "camelCase")]
pub enum SaleStrategy {
    FixedPrice(FixedPriceSale),
    Allowlist(AllowlistSale),
    Erc20(Erc20Sale),
    Timed(TimedSale),
}

impl SaleStrategy {
    pub fn kind(&self) -> SaleKind {
        match self {
            Self::FixedPrice(_) => SaleKind::FixedPrice,
            Self::Allowlist(_) => SaleKind::Allowlist,
            Self::Erc20(_) => SaleKind::Erc20,
            Self::Timed(_) => SaleKind::Timed,
        }
    }

    pub fn minter(&self) -> Address {
        match self {
            Self::FixedPrice(s) => s.minter,
            Self::Allowlist(s) => s.minter,
            Self::Erc20(s) => s.minter,
            Self::Timed(s) => s.minter,
        }
    }

    pub fn sale_start(&self) -> u64 {
        match self {
            Self::FixedPrice(s) => s.sale_start,
            Self::Allowlist(s) => s.sale_start,
            Self::Erc20(s) => s.sale_start,
            Self::Timed(s) => s.sale_start,
        }
    }

    pub fn sale_end(&self) -> Option<u64> {
        match self {
            Self::FixedPrice(s) => Some(s.sale_end),
            Self::Allowlist(s) => Some(s.sale_end),
            Self::Erc20(s) => Some(s.sale_end),
            Self::Timed(s) => s.sale_end,
        }
    }

    /// Native protocol fee charged per minted token.
    pub fn mint_fee_per_quantity(&self) -> U256 {
        match self {
            Self::FixedPrice(s) => s.mint_fee_per_quantity,
            Self::Allowlist(s) => s.mint_fee_per_quantity,
            Self::Erc20(s) => s.mint_fee_per_quantity(),
            Self::Timed(s) => s.mint_fee,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SaleState {
    NotStarted,
    PrimaryActive,
    Ended,
    SecondaryActive,
}

/// A sale strategy with its window lifted out. Built only through
/// `NormalizedSaleConfig::new`, which enforces `sale_end >= sale_start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSaleConfig {
    pub sales_strategy: SaleStrategy,
    pub sale_start: u64,
    pub sale_end: Option<u64>,
}

impl NormalizedSaleConfig {
    pub fn new(sales_strategy: SaleStrategy) -> Result<Self, SdkError> {
        let sale_start = sales_strategy.sale_start();
        let sale_end = sales_strategy.sale_end();
        if let Some(end) = sale_end {
            if end < sale_start {
                return Err(SdkError::InvalidSaleWindow {
                    sale_start,
                    sale_end: end,
                });
            }
        }
        Ok(Self {
            sales_strategy,
            sale_start,
            sale_end,
        })
    }

    pub fn kind(&self) -> SaleKind {
        self.sales_strategy.kind()
    }

    pub fn primary_mint_active(&self, block_time: u64) -> bool {
        self.sale_start <= block_time && self.sale_end.map_or(true, |end| end > block_time)
    }

    pub fn secondary_market_active(&self) -> bool {
        matches!(&self.sales_strategy, SaleStrategy::Timed(t) if t.secondary_activated)
    }

    pub fn state_at(&self, block_time: u64) -> SaleState {
        if self.secondary_market_active() {
            SaleState::SecondaryActive
        } else if block_time < self.sale_start {
            SaleState::NotStarted
        } else if self.primary_mint_active(block_time) {
            SaleState::PrimaryActive
        } else {
            SaleState::Ended
        }
    }

    pub fn resolve(&self, block_time: u64) -> ResolvedStrategy {
        ResolvedStrategy {
            strategy: self.clone(),
            primary_mint_active: self.primary_mint_active(block_time),
            secondary_market_active: self.secondary_market_active(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStrategy {
    pub strategy: NormalizedSaleConfig,
    pub primary_mint_active: bool,
    pub secondary_market_active: bool,
}
