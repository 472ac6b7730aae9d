// Utility modules

use std::future::Future;
use std::time::Duration;

use ethers::types::{Address, U256};

use crate::{
    constants::{DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_RETRY_MAX_ATTEMPTS},
    error::{Result, SdkError},
};

/// Linear backoff: attempt `n` failing waits `n * base_delay` before the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_RETRY_MAX_ATTEMPTS,
            Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        )
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Runs `op` until it succeeds or `policy.max_attempts` is reached, returning
/// the last error. `op` receives the 1-based attempt number.
pub async fn with_retries<T, F, Fut>(policy: RetryPolicy, label: &str, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    "{} failed (attempt {}/{}, transient={}): {}. Retrying in {}ms",
                    label,
                    attempt,
                    policy.max_attempts,
                    err.is_transient(),
                    err,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Parses a decimal string from the indexer into a 256-bit integer.
pub fn parse_u256(field: &'static str, value: &str) -> Result<U256> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(SdkError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    U256::from_dec_str(trimmed).map_err(|_| SdkError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

pub fn parse_u64(field: &'static str, value: &str) -> Result<u64> {
    let parsed = parse_u256(field, value)?;
    if parsed > U256::from(u64::MAX) {
        return Err(SdkError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    Ok(parsed.as_u64())
}

pub fn parse_address(field: &'static str, value: &str) -> Result<Address> {
    let addr = value.trim();
    let hex_part = addr.strip_prefix("0x").unwrap_or(addr);
    if hex_part.len() != 40 {
        return Err(SdkError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
    hex_part.parse::<Address>().map_err(|_| SdkError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn with_retries_returns_first_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let result = with_retries(policy, "test", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(SdkError::Indexer("timeout".to_string()))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn with_retries_propagates_last_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let result: Result<()> = with_retries(policy, "test", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(SdkError::Indexer(format!("timeout on attempt {attempt}"))) }
        })
        .await;
        match result {
            Err(SdkError::Indexer(message)) => assert_eq!(message, "timeout on attempt 3"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn with_retries_uses_every_attempt_for_unrecognised_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let result: Result<()> = with_retries(policy, "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(SdkError::Indexer("indexing_error".to_string())) }
        })
        .await;
        assert!(!SdkError::Indexer("indexing_error".to_string()).is_transient());
        match result {
            Err(SdkError::Indexer(message)) => assert_eq!(message, "indexing_error"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn delay_grows_linearly() {
        let policy = RetryPolicy::new(4, Duration::from_millis(100));
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(3), Duration::from_millis(300));
    }

    #[test]
    fn retry_policy_never_allows_zero_attempts() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[test]
    fn parse_u256_handles_values_beyond_u128() {
        let big = "340282366920938463463374607431768211457";
        assert_eq!(parse_u256("price", big).unwrap(), U256::from_dec_str(big).unwrap());
    }

    #[test]
    fn parse_u256_rejects_floats_and_signs() {
        assert!(parse_u256("price", "1.5").is_err());
        assert!(parse_u256("price", "-1").is_err());
        assert!(parse_u256("price", "").is_err());
        assert!(parse_u256("price", "1e18").is_err());
    }

    #[test]
    fn parse_u64_rejects_overflow() {
        assert_eq!(parse_u64("saleEnd", "18446744073709551615").unwrap(), u64::MAX);
        assert!(parse_u64("saleEnd", "18446744073709551616").is_err());
    }

    #[test]
    fn parse_address_accepts_prefixed_and_bare() {
        let a = parse_address("minter", "0x04E2516A2c207E84a1839755675dfd8eF6302F0a").unwrap();
        let b = parse_address("minter", "04e2516a2c207e84a1839755675dfd8ef6302f0a").unwrap();
        assert_eq!(a, b);
        assert!(parse_address("minter", "0x1234").is_err());
    }
}
