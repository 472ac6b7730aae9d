// Sale resolution and mint pricing
pub mod cost_calculator;
pub mod mint_service;
pub mod minter_defaults;
pub mod normalizer;
pub mod strategy_selector;

// Re-export for convenience
pub use cost_calculator::compute_costs;
pub use mint_service::{AllowlistMintArgs, MintParameters, MintRequest, MintService, PreparedMint};
pub use minter_defaults::{
    apply_defaults, apply_defaults_now, parse_name_into_symbol, ConcreteSalesConfig,
    SalesConfigParams,
};
pub use normalizer::{normalize, normalize_all};
pub use strategy_selector::select_active_strategy;
