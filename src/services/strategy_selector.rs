use crate::{
    error::{Result, SdkError},
    models::{NormalizedSaleConfig, ResolvedStrategy, SaleKind},
};

/// Types tried, in order, when the preferred type has no eligible sale.
/// Allowlist is excluded: eligibility for it cannot be assumed for an
/// arbitrary minter, so it is only ever returned when asked for by name.
const FALLBACK_KINDS: [SaleKind; 3] = [SaleKind::Timed, SaleKind::FixedPrice, SaleKind::Erc20];

/// Picks the sale a mint should go through at `block_time`.
///
/// Returns `Ok(None)` when the token has no sale configured, or when nothing
/// is eligible and no type was preferred. With a preference and no eligible
/// match, fails with `NoValidSaleStrategy`.
pub fn select_active_strategy(
    configs: &[NormalizedSaleConfig],
    block_time: u64,
    preferred: Option<SaleKind>,
) -> Result<Option<ResolvedStrategy>> {
    if configs.is_empty() {
        return Ok(None);
    }

    let mut eligible: Vec<ResolvedStrategy> = configs
        .iter()
        .map(|config| config.resolve(block_time))
        .filter(|resolved| resolved.primary_mint_active || resolved.secondary_market_active)
        .collect();

    // Ascending sale end with open-ended sales (`None`) first. Kept for
    // compatibility with existing clients; the stable sort preserves indexer
    // order between equal ends.
    eligible.sort_by_key(|resolved| resolved.strategy.sale_end);

    let Some(preferred) = preferred else {
        let selected = eligible.into_iter().next();
        if let Some(resolved) = &selected {
            tracing::debug!(
                "Selected {} sale (primary={}, secondary={})",
                resolved.strategy.kind(),
                resolved.primary_mint_active,
                resolved.secondary_market_active
            );
        }
        return Ok(selected);
    };

    if let Some(index) = eligible
        .iter()
        .position(|resolved| resolved.strategy.kind() == preferred)
    {
        return Ok(Some(eligible.swap_remove(index)));
    }

    if let Some(index) = eligible
        .iter()
        .position(|resolved| FALLBACK_KINDS.contains(&resolved.strategy.kind()))
    {
        let resolved = eligible.swap_remove(index);
        tracing::debug!(
            "No active {} sale, falling back to {}",
            preferred,
            resolved.strategy.kind()
        );
        return Ok(Some(resolved));
    }

    Err(SdkError::NoValidSaleStrategy)
}
