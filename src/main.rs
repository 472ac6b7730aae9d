use clap::Parser;
use ethers::types::{Address, U256};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mint_sale_core::{
    config::Config,
    integrations::CoinGeckoOracle,
    models::UsdAmounts,
    utils::{parse_address, parse_u256},
    MintRequest, MintService, PreparedMint, SaleKind,
};

// Covers both the binary's own target and the library's.
const DEFAULT_LOG_FILTER: &str = "mint_quote=debug,mint_sale_core=debug";

/// Resolve a token's active sale and price a mint through it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Token contract address
    #[arg(long, value_parser = address_arg)]
    contract: Address,

    /// Token id within the contract
    #[arg(long, value_parser = token_id_arg)]
    token_id: U256,

    #[arg(long, default_value_t = 1)]
    quantity: u64,

    /// Account that will send the mint; needed for allowlist sales
    #[arg(long, value_parser = address_arg)]
    minter: Option<Address>,

    #[arg(long, value_parser = address_arg)]
    recipient: Option<Address>,

    #[arg(long, value_parser = address_arg)]
    mint_referral: Option<Address>,

    #[arg(long)]
    comment: Option<String>,

    /// Preferred sale type: fixedPrice, allowlist, erc20 or timed
    #[arg(long)]
    prefer: Option<SaleKind>,

    /// Include USD values from the price API
    #[arg(long)]
    usd: bool,
}

fn address_arg(value: &str) -> Result<Address, String> {
    parse_address("address", value).map_err(|e| e.to_string())
}

fn token_id_arg(value: &str) -> Result<U256, String> {
    parse_u256("tokenId", value).map_err(|e| e.to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    #[serde(flatten)]
    prepared: PreparedMint,
    #[serde(skip_serializing_if = "Option::is_none")]
    usd: Option<UsdAmounts>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Chain id: {} (testnet: {})", config.chain_id, config.is_testnet());

    let service = MintService::from_config(&config);
    let block_time = chrono::Utc::now().timestamp().max(0) as u64;

    let prepared = service
        .prepare_mint(MintRequest {
            contract: args.contract,
            token_id: args.token_id,
            quantity: args.quantity,
            minter_account: args.minter.unwrap_or_else(Address::zero),
            recipient: args.recipient,
            mint_referral: args.mint_referral,
            comment: args.comment,
            block_time,
            preferred: args.prefer,
        })
        .await
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.code()))?;

    let usd = if args.usd {
        let oracle = CoinGeckoOracle::new(config.price_api_url.clone(), config.retry_policy());
        Some(prepared.quote.usdc(&oracle).await?)
    } else {
        None
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&Output { prepared, usd })?
    );

    Ok(())
}
