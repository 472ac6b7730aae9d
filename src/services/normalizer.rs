use ethers::types::{H256, U256};

use crate::{
    constants::{
        SALE_TYPE_ERC20_MINTER, SALE_TYPE_FIXED_PRICE, SALE_TYPE_PRESALE, SALE_TYPE_ZORA_TIMED,
    },
    error::{Result, SdkError},
    indexer::records::{
        RawErc20Minter, RawFixedPrice, RawPresale, RawSalesStrategy, RawTimedMinter,
        TokenSalesData,
    },
    models::{
        AllowlistSale, Erc20Sale, FixedPriceSale, NormalizedSaleConfig, SaleStrategy, TimedSale,
    },
    utils::{parse_address, parse_u256, parse_u64},
};

/// Converts one indexer record into a `NormalizedSaleConfig`.
///
/// `contract_default_fee` is the parent contract's per-quantity mint fee; it
/// is attached to fixed price and allowlist sales, which do not carry a fee
/// of their own.
pub fn normalize(raw: &RawSalesStrategy, contract_default_fee: U256) -> Result<NormalizedSaleConfig> {
    let malformed = || SdkError::MalformedSaleRecord(raw.kind.clone());

    let strategy = match raw.kind.as_str() {
        SALE_TYPE_FIXED_PRICE => {
            let record = raw.fixed_price.as_ref().ok_or_else(malformed)?;
            SaleStrategy::FixedPrice(fixed_price(record, contract_default_fee)?)
        }
        SALE_TYPE_ERC20_MINTER => {
            let record = raw.erc20_minter.as_ref().ok_or_else(malformed)?;
            SaleStrategy::Erc20(erc20(record)?)
        }
        SALE_TYPE_PRESALE => {
            let record = raw.presale.as_ref().ok_or_else(malformed)?;
            SaleStrategy::Allowlist(presale(record, contract_default_fee)?)
        }
        SALE_TYPE_ZORA_TIMED => {
            let record = raw.zora_timed_minter.as_ref().ok_or_else(malformed)?;
            SaleStrategy::Timed(timed(record)?)
        }
        other => return Err(SdkError::UnknownSaleType(other.to_string())),
    };

    NormalizedSaleConfig::new(strategy)
}

/// Normalizes every record of a token. An unknown sale type fails the whole
/// batch; a record with an inverted sale window is skipped.
pub fn normalize_all(data: &TokenSalesData) -> Result<Vec<NormalizedSaleConfig>> {
    if data.strategies.is_empty() {
        return Ok(vec![]);
    }
    let contract_default_fee = parse_u256("mintFeePerQuantity", &data.contract_mint_fee)?;

    let mut configs = Vec::with_capacity(data.strategies.len());
    for raw in &data.strategies {
        match normalize(raw, contract_default_fee) {
            Ok(config) => configs.push(config),
            Err(err @ SdkError::InvalidSaleWindow { .. }) => {
                tracing::warn!("Skipping {} sale with invalid window: {}", raw.kind, err);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(configs)
}

fn fixed_price(record: &RawFixedPrice, contract_default_fee: U256) -> Result<FixedPriceSale> {
    Ok(FixedPriceSale {
        minter: parse_address("fixedPrice.address", &record.address)?,
        price_per_token: parse_u256("fixedPrice.pricePerToken", &record.price_per_token)?,
        max_tokens_per_address: parse_u64(
            "fixedPrice.maxTokensPerAddress",
            &record.max_tokens_per_address,
        )?,
        sale_start: parse_u64("fixedPrice.saleStart", &record.sale_start)?,
        sale_end: parse_u64("fixedPrice.saleEnd", &record.sale_end)?,
        mint_fee_per_quantity: contract_default_fee,
    })
}

fn erc20(record: &RawErc20Minter) -> Result<Erc20Sale> {
    Ok(Erc20Sale {
        minter: parse_address("erc20Minter.address", &record.address)?,
        currency: parse_address("erc20Minter.currency", &record.currency)?,
        price_per_token: parse_u256("erc20Minter.pricePerToken", &record.price_per_token)?,
        max_tokens_per_address: parse_u64(
            "erc20Minter.maxTokensPerAddress",
            &record.max_tokens_per_address,
        )?,
        sale_start: parse_u64("erc20Minter.saleStart", &record.sale_start)?,
        sale_end: parse_u64("erc20Minter.saleEnd", &record.sale_end)?,
    })
}

fn presale(record: &RawPresale, contract_default_fee: U256) -> Result<AllowlistSale> {
    Ok(AllowlistSale {
        minter: parse_address("presale.address", &record.address)?,
        merkle_root: parse_merkle_root(&record.merkle_root)?,
        sale_start: parse_u64("presale.presaleStart", &record.presale_start)?,
        sale_end: parse_u64("presale.presaleEnd", &record.presale_end)?,
        mint_fee_per_quantity: contract_default_fee,
    })
}

fn timed(record: &RawTimedMinter) -> Result<TimedSale> {
    let sale_end = parse_u64("zoraTimedMinter.saleEnd", &record.sale_end)?;
    let market_countdown = record
        .market_countdown
        .as_deref()
        .map(|v| parse_u64("zoraTimedMinter.marketCountdown", v))
        .transpose()?;
    let minimum_market_eth = record
        .minimum_market_eth
        .as_deref()
        .map(|v| parse_u256("zoraTimedMinter.minimumMarketEth", v))
        .transpose()?;

    Ok(TimedSale {
        minter: parse_address("zoraTimedMinter.address", &record.address)?,
        mint_fee: parse_u256("zoraTimedMinter.mintFee", &record.mint_fee)?,
        sale_start: parse_u64("zoraTimedMinter.saleStart", &record.sale_start)?,
        // Zero means the countdown has not started, not that the sale ended.
        sale_end: (sale_end != 0).then_some(sale_end),
        erc20_z: parse_address("zoraTimedMinter.erc20Z.id", &record.erc20_z.id)?,
        pool: parse_address("zoraTimedMinter.erc20Z.pool", &record.erc20_z.pool)?,
        secondary_activated: record.secondary_activated,
        market_countdown,
        minimum_market_eth,
    })
}

fn parse_merkle_root(value: &str) -> Result<H256> {
    let invalid = || SdkError::InvalidNumber {
        field: "presale.merkleRoot",
        value: value.to_string(),
    };
    let trimmed = value.trim();
    let bytes = hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed)).map_err(|_| invalid())?;
    if bytes.len() != 32 {
        return Err(invalid());
    }
    Ok(H256::from_slice(&bytes))
}
