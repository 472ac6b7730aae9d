/// Protocol constants

// Market economics for timed sales
pub const MARKET_REWARD_PER_MINT_WEI: u64 = 11_100_000_000_000; // 0.0000111 ETH
pub const DEFAULT_MINIMUM_MINTS_FOR_COUNTDOWN: u64 = 1_111;
pub const DEFAULT_MARKET_COUNTDOWN_SECS: u64 = 24 * 60 * 60;

// 1 spark = 0.000001 ETH
pub const SPARK_VALUE_WEI: u64 = 1_000_000_000_000;

pub const WEI_DECIMALS: u32 = 18;

// Open-ended sale window end
pub const SALE_END_FOREVER: u64 = u64::MAX;

// Indexer discriminants
pub const SALE_TYPE_FIXED_PRICE: &str = "FIXED_PRICE";
pub const SALE_TYPE_ERC20_MINTER: &str = "ERC_20_MINTER";
pub const SALE_TYPE_PRESALE: &str = "PRESALE";
pub const SALE_TYPE_ZORA_TIMED: &str = "ZORA_TIMED";

// Creator input discriminants
pub const PARAMS_TYPE_ALLOWLIST: &str = "allowlistMint";
pub const PARAMS_TYPE_ERC20: &str = "erc20Mint";
pub const PARAMS_TYPE_FIXED_PRICE: &str = "fixedPrice";

// ERC-20 symbol generation
pub const SYMBOL_PREFIX: char = '$';
pub const SYMBOL_MAX_LEN: usize = 4;

// External services
pub const DEFAULT_ALLOWLIST_API_URL: &str = "https://allowlist.zora.co";
pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_CHAIN_ID: u64 = 8453;

// Retry policy for the query layer
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 750;

// HTTP timeouts
pub const HTTP_TIMEOUT_MS: u64 = 10_000;
