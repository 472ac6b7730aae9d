use ethers::types::{Address, H256, U256};
use serde::Serialize;

use crate::{
    config::ProtocolConstants,
    constants::{
        PARAMS_TYPE_ALLOWLIST, PARAMS_TYPE_ERC20, PARAMS_TYPE_FIXED_PRICE, SALE_END_FOREVER,
        SYMBOL_MAX_LEN, SYMBOL_PREFIX,
    },
    error::{Result, SdkError},
};

/// Sale settings as supplied by a creator; anything left `None` is filled in
/// by `apply_defaults`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesConfigParams {
    pub sale_type: Option<String>,
    pub price_per_token: Option<U256>,
    pub sale_start: Option<u64>,
    pub sale_end: Option<u64>,
    pub max_tokens_per_address: Option<u64>,
    pub currency: Option<Address>,
    pub presale_merkle_root: Option<H256>,
    pub erc20_name: Option<String>,
    pub erc20_symbol: Option<String>,
    pub market_countdown: Option<u64>,
    pub minimum_market_eth: Option<U256>,
    pub minimum_mints_for_countdown: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConcreteSalesConfig {
    #[serde(rename_all = "camelCase")]
    FixedPrice {
        price_per_token: U256,
        sale_start: u64,
        sale_end: u64,
        max_tokens_per_address: u64,
    },
    #[serde(rename_all = "camelCase")]
    Allowlist {
        presale_merkle_root: H256,
        sale_start: u64,
        sale_end: u64,
    },
    #[serde(rename_all = "camelCase")]
    Erc20 {
        currency: Address,
        price_per_token: U256,
        sale_start: u64,
        sale_end: u64,
        max_tokens_per_address: u64,
    },
    #[serde(rename_all = "camelCase")]
    Timed {
        erc20_name: String,
        erc20_symbol: String,
        sale_start: u64,
        market_countdown: u64,
        minimum_market_eth: U256,
        minimum_mints_for_countdown: U256,
    },
}

/// Fills in a creator's partial sale settings. `now` is the default start of
/// non-timed sales.
pub fn apply_defaults(
    partial: Option<&SalesConfigParams>,
    contract_name: &str,
    constants: &ProtocolConstants,
    now: u64,
) -> Result<ConcreteSalesConfig> {
    let Some(params) = partial else {
        return timed_defaults(&SalesConfigParams::default(), contract_name, constants);
    };

    let sale_type = params.sale_type.as_deref();
    let priced = params.price_per_token.map_or(false, |p| !p.is_zero());

    if sale_type == Some(PARAMS_TYPE_ALLOWLIST) {
        return Ok(ConcreteSalesConfig::Allowlist {
            presale_merkle_root: params
                .presale_merkle_root
                .ok_or(SdkError::MissingField("presaleMerkleRoot"))?,
            sale_start: params.sale_start.unwrap_or(now),
            sale_end: params.sale_end.unwrap_or(SALE_END_FOREVER),
        });
    }
    if sale_type == Some(PARAMS_TYPE_ERC20) {
        return Ok(ConcreteSalesConfig::Erc20 {
            currency: params.currency.ok_or(SdkError::MissingField("currency"))?,
            price_per_token: params
                .price_per_token
                .ok_or(SdkError::MissingField("pricePerToken"))?,
            sale_start: params.sale_start.unwrap_or(now),
            sale_end: params.sale_end.unwrap_or(SALE_END_FOREVER),
            max_tokens_per_address: params.max_tokens_per_address.unwrap_or(0),
        });
    }
    if sale_type == Some(PARAMS_TYPE_FIXED_PRICE) || priced {
        return Ok(ConcreteSalesConfig::FixedPrice {
            price_per_token: params.price_per_token.unwrap_or_default(),
            sale_start: params.sale_start.unwrap_or(now),
            sale_end: params.sale_end.unwrap_or(SALE_END_FOREVER),
            max_tokens_per_address: params.max_tokens_per_address.unwrap_or(0),
        });
    }

    timed_defaults(params, contract_name, constants)
}

/// `apply_defaults` with the wall clock as `now`.
pub fn apply_defaults_now(
    partial: Option<&SalesConfigParams>,
    contract_name: &str,
    constants: &ProtocolConstants,
) -> Result<ConcreteSalesConfig> {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    apply_defaults(partial, contract_name, constants, now)
}

fn timed_defaults(
    params: &SalesConfigParams,
    contract_name: &str,
    constants: &ProtocolConstants,
) -> Result<ConcreteSalesConfig> {
    let reward = constants.market_reward_per_mint;

    let minimum_market_eth = match (params.minimum_mints_for_countdown, params.minimum_market_eth) {
        (Some(mints), _) => mints
            .checked_mul(reward)
            .ok_or(SdkError::AmountOverflow("minimumMarketEth"))?,
        (None, Some(value)) => value,
        (None, None) => constants.default_minimum_market_eth(),
    };
    // Both fields must agree, whichever one the creator set.
    let minimum_mints_for_countdown = minimum_market_eth
        .checked_div(reward)
        .ok_or_else(|| SdkError::Config("market reward per mint is zero".to_string()))?;

    let erc20_name = params
        .erc20_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| contract_name.to_string());
    let erc20_symbol = match params.erc20_symbol.clone() {
        Some(symbol) if !symbol.trim().is_empty() => symbol,
        _ => parse_name_into_symbol(&erc20_name)?,
    };

    Ok(ConcreteSalesConfig::Timed {
        erc20_name,
        erc20_symbol,
        sale_start: params.sale_start.unwrap_or(0),
        market_countdown: params
            .market_countdown
            .unwrap_or(constants.default_market_countdown),
        minimum_market_eth,
        minimum_mints_for_countdown,
    })
}

/// Derives an ERC-20 ticker from a display name: alphanumerics only,
/// uppercased, vowels dropped, at most four characters, `$`-prefixed.
pub fn parse_name_into_symbol(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(SdkError::SymbolGeneration("name is empty".to_string()));
    }

    let body: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| !matches!(c, 'A' | 'E' | 'I' | 'O' | 'U'))
        .take(SYMBOL_MAX_LEN)
        .collect();

    if body.is_empty() {
        return Err(SdkError::SymbolGeneration(format!(
            "no usable characters in {:?}",
            name
        )));
    }
    Ok(format!("{}{}", SYMBOL_PREFIX, body))
}
