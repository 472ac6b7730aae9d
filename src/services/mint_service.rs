use ethers::types::{Address, H256, U256};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    config::{Config, ProtocolConstants},
    error::{Result, SdkError},
    indexer::{SaleStrategySource, SubgraphClient},
    integrations::{AllowListApiClient, AllowListProvider},
    models::{
        Erc20Approval, MarketStatus, MintCosts, NormalizedSaleConfig, PriceQuote,
        ResolvedStrategy, SaleKind, SaleStrategy,
    },
    services::{
        cost_calculator::compute_costs, normalizer::normalize_all,
        strategy_selector::select_active_strategy,
    },
};

/// What a caller wants to mint.
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub contract: Address,
    pub token_id: U256,
    pub quantity: u64,
    pub minter_account: Address,
    /// Defaults to `minter_account`.
    pub recipient: Option<Address>,
    pub mint_referral: Option<Address>,
    pub comment: Option<String>,
    pub block_time: u64,
    pub preferred: Option<SaleKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowlistMintArgs {
    pub max_quantity: u64,
    pub price_per_token: U256,
    pub proof: Vec<H256>,
}

/// Arguments for the mint call, minus the final ABI encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintParameters {
    pub minter: Address,
    pub sale_type: SaleKind,
    pub quantity: u64,
    pub recipient: Address,
    pub mint_referral: Option<Address>,
    pub comment: String,
    /// Native value to send along with the call.
    pub value: U256,
    pub allowlist: Option<AllowlistMintArgs>,
    pub erc20_approval: Option<Erc20Approval>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedMint {
    pub strategy: ResolvedStrategy,
    pub costs: MintCosts,
    pub quote: PriceQuote,
    pub parameters: MintParameters,
    /// Bonding-curve market state; set for timed sales only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketStatus>,
}

/// Resolves a token's sale and prices a mint through it.
pub struct MintService {
    source: Arc<dyn SaleStrategySource>,
    allowlist: Arc<dyn AllowListProvider>,
    constants: ProtocolConstants,
}

impl MintService {
    pub fn new(
        source: Arc<dyn SaleStrategySource>,
        allowlist: Arc<dyn AllowListProvider>,
        constants: ProtocolConstants,
    ) -> Self {
        Self {
            source,
            allowlist,
            constants,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let retry = config.retry_policy();
        Self::new(
            Arc::new(SubgraphClient::new(config.subgraph_url.clone(), retry)),
            Arc::new(AllowListApiClient::new(
                config.allowlist_api_url.clone(),
                retry,
            )),
            config.protocol,
        )
    }

    pub async fn sale_configs(
        &self,
        contract: Address,
        token_id: U256,
    ) -> Result<Vec<NormalizedSaleConfig>> {
        let data = self.source.token_sales(contract, token_id).await?;
        let configs = normalize_all(&data)?;
        tracing::debug!(
            "Token {:#x}/{} has {} sale config(s)",
            contract,
            token_id,
            configs.len()
        );
        Ok(configs)
    }

    pub async fn resolve(
        &self,
        contract: Address,
        token_id: U256,
        block_time: u64,
        preferred: Option<SaleKind>,
    ) -> Result<Option<ResolvedStrategy>> {
        let configs = self.sale_configs(contract, token_id).await?;
        select_active_strategy(&configs, block_time, preferred)
    }

    pub async fn prepare_mint(&self, request: MintRequest) -> Result<PreparedMint> {
        if request.quantity == 0 {
            return Err(SdkError::InvalidQuantity(request.quantity));
        }

        let resolved = self
            .resolve(
                request.contract,
                request.token_id,
                request.block_time,
                request.preferred,
            )
            .await?
            .ok_or(SdkError::NoValidSaleStrategy)?;

        if !resolved.primary_mint_active {
            // Only the secondary market is live; minting goes through the pool.
            return Err(SdkError::PrimaryMintInactive);
        }

        let strategy = &resolved.strategy.sales_strategy;
        let entry = match strategy {
            SaleStrategy::Allowlist(sale) => {
                let entry = self
                    .allowlist
                    .entry_for(sale.merkle_root, request.minter_account)
                    .await?
                    .ok_or_else(|| {
                        SdkError::NotOnAllowList(format!("{:#x}", request.minter_account))
                    })?;
                Some(entry)
            }
            _ => None,
        };

        let market = match strategy {
            SaleStrategy::Timed(sale) => Some(sale.market_status()),
            _ => None,
        };

        let costs = compute_costs(strategy, request.quantity, entry.as_ref())?;
        let quote = PriceQuote::from_costs(&costs, self.constants.spark_value)?;

        let parameters = MintParameters {
            minter: strategy.minter(),
            sale_type: strategy.kind(),
            quantity: request.quantity,
            recipient: request.recipient.unwrap_or(request.minter_account),
            mint_referral: request.mint_referral,
            comment: request.comment.unwrap_or_default(),
            value: costs.total_cost,
            allowlist: entry.map(|entry| AllowlistMintArgs {
                max_quantity: entry.max_can_mint,
                price_per_token: entry.price,
                proof: entry.proof,
            }),
            erc20_approval: costs.erc20_approval,
        };

        tracing::info!(
            "Prepared {} mint of {} via {:#x}, value {} wei",
            parameters.sale_type,
            parameters.quantity,
            parameters.minter,
            parameters.value
        );

        Ok(PreparedMint {
            strategy: resolved,
            costs,
            quote,
            parameters,
            market,
        })
    }
}
