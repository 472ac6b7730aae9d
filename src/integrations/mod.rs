pub mod allowlist_api;
pub mod price_oracle;

pub use allowlist_api::{AllowListApiClient, AllowListProvider};
pub use price_oracle::{CoinGeckoOracle, PriceOracle};
