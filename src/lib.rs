//! Sale-strategy resolution and mint-cost computation for protocol tokens.

pub mod config;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod indexer;
pub mod integrations;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{Config, ProtocolConstants};
pub use error::{Result, SdkError};
pub use models::{
    AllowListEntry, MintCosts, NormalizedSaleConfig, PriceQuote, ResolvedStrategy, SaleKind,
    SaleStrategy,
};
pub use services::{
    apply_defaults, compute_costs, normalize, select_active_strategy, MintRequest, MintService,
    PreparedMint,
};
