use serde::{Deserialize, Serialize};

/// One `salesStrategies` entry from the subgraph. Exactly one of the payloads
/// is expected to be set, matching `kind`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSalesStrategy {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub fixed_price: Option<RawFixedPrice>,
    #[serde(default)]
    pub erc20_minter: Option<RawErc20Minter>,
    #[serde(default)]
    pub presale: Option<RawPresale>,
    #[serde(default)]
    pub zora_timed_minter: Option<RawTimedMinter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFixedPrice {
    pub address: String,
    pub price_per_token: String,
    pub sale_start: String,
    pub sale_end: String,
    pub max_tokens_per_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawErc20Minter {
    pub address: String,
    pub currency: String,
    pub price_per_token: String,
    pub sale_start: String,
    pub sale_end: String,
    pub max_tokens_per_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPresale {
    pub address: String,
    pub presale_start: String,
    pub presale_end: String,
    pub merkle_root: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimedMinter {
    pub address: String,
    pub mint_fee: String,
    pub sale_start: String,
    pub sale_end: String,
    pub erc20_z: RawErc20Z,
    #[serde(default)]
    pub secondary_activated: bool,
    #[serde(default)]
    pub market_countdown: Option<String>,
    #[serde(default)]
    pub minimum_market_eth: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawErc20Z {
    pub id: String,
    pub pool: String,
}

/// Everything the client needs from the indexer to resolve a token's sale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSalesData {
    /// Decimal string of the parent contract's per-quantity mint fee.
    pub contract_mint_fee: String,
    pub strategies: Vec<RawSalesStrategy>,
}
