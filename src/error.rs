use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Unknown sale type: {0}")]
    UnknownSaleType(String),

    #[error("Cannot generate symbol: {0}")]
    SymbolGeneration(String),

    #[error("No valid sale strategy found")]
    NoValidSaleStrategy,

    #[error("Requested quantity {requested} exceeds allowlist cap {max_can_mint}")]
    ExceedsAllowlistCap { requested: u64, max_can_mint: u64 },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u64),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid address for {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("Sale end {sale_end} is before sale start {sale_start}")]
    InvalidSaleWindow { sale_start: u64, sale_end: u64 },

    #[error("Malformed {0} sale record")]
    MalformedSaleRecord(String),

    #[error("Allowlist sale requires an allowlist entry")]
    AllowListEntryRequired,

    #[error("Address {0} is not on the allowlist")]
    NotOnAllowList(String),

    #[error("Primary mint is not active")]
    PrimaryMintInactive,

    #[error("Amount overflow while computing {0}")]
    AmountOverflow(&'static str),

    #[error("Indexer error: {0}")]
    Indexer(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SdkError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            SdkError::UnknownSaleType(_) => "UNKNOWN_SALE_TYPE",
            SdkError::SymbolGeneration(_) => "SYMBOL_GENERATION_ERROR",
            SdkError::NoValidSaleStrategy => "NO_VALID_SALE_STRATEGY",
            SdkError::ExceedsAllowlistCap { .. } => "EXCEEDS_ALLOWLIST_CAP",
            SdkError::InvalidQuantity(_) => "INVALID_QUANTITY",
            SdkError::MissingField(_) => "MISSING_FIELD",
            SdkError::InvalidNumber { .. } => "INVALID_NUMBER",
            SdkError::InvalidAddress { .. } => "INVALID_ADDRESS",
            SdkError::InvalidSaleWindow { .. } => "INVALID_SALE_WINDOW",
            SdkError::MalformedSaleRecord(_) => "MALFORMED_SALE_RECORD",
            SdkError::AllowListEntryRequired => "ALLOWLIST_ENTRY_REQUIRED",
            SdkError::NotOnAllowList(_) => "NOT_ON_ALLOWLIST",
            SdkError::PrimaryMintInactive => "PRIMARY_MINT_INACTIVE",
            SdkError::AmountOverflow(_) => "AMOUNT_OVERFLOW",
            SdkError::Indexer(_) => "INDEXER_ERROR",
            SdkError::ExternalApi(_) => "EXTERNAL_API_ERROR",
            SdkError::Http(_) => "HTTP_ERROR",
            SdkError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether retrying the I/O that produced this error can succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SdkError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            SdkError::Indexer(message) | SdkError::ExternalApi(message) => {
                let lower = message.to_ascii_lowercase();
                lower.contains("too many requests")
                    || lower.contains("429")
                    || lower.contains("timeout")
                    || lower.contains("timed out")
                    || lower.contains("gateway")
                    || lower.contains("service unavailable")
                    || lower.contains("internal server error")
                    || lower.contains("temporarily unavailable")
                    || lower.contains("connection reset")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_for_domain_errors() {
        assert_eq!(SdkError::NoValidSaleStrategy.code(), "NO_VALID_SALE_STRATEGY");
        assert_eq!(SdkError::InvalidQuantity(0).code(), "INVALID_QUANTITY");
        assert_eq!(
            SdkError::ExceedsAllowlistCap {
                requested: 3,
                max_can_mint: 2
            }
            .code(),
            "EXCEEDS_ALLOWLIST_CAP"
        );
    }

    #[test]
    fn domain_errors_are_never_transient() {
        assert!(!SdkError::UnknownSaleType("NEW".to_string()).is_transient());
        assert!(!SdkError::NoValidSaleStrategy.is_transient());
    }

    #[test]
    fn gateway_failures_are_transient() {
        assert!(SdkError::Indexer("502 Bad Gateway".to_string()).is_transient());
        assert!(SdkError::ExternalApi("Too Many Requests".to_string()).is_transient());
        assert!(!SdkError::Indexer("field not found".to_string()).is_transient());
    }
}
