pub mod allowlist;
pub mod quote;
pub mod sale;

pub use allowlist::AllowListEntry;
pub use quote::{AmountPair, Erc20Approval, MintCosts, PriceQuote, UsdAmounts};
pub use sale::{
    AllowlistSale, Erc20Sale, FixedPriceSale, MarketStatus, NormalizedSaleConfig,
    ResolvedStrategy, SaleKind, SaleState, SaleStrategy, TimedSale,
};
