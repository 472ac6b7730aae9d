use ethers::types::U256;

use crate::{
    error::{Result, SdkError},
    models::{AllowListEntry, Erc20Approval, MintCosts, SaleStrategy},
};

fn times(quantity: u64, amount: U256, what: &'static str) -> Result<U256> {
    amount
        .checked_mul(U256::from(quantity))
        .ok_or(SdkError::AmountOverflow(what))
}

fn plus(a: U256, b: U256, what: &'static str) -> Result<U256> {
    a.checked_add(b).ok_or(SdkError::AmountOverflow(what))
}

/// Computes what minting `quantity` tokens through `strategy` costs.
///
/// Allowlist sales price from `allow_list_entry`, which must be present and
/// must allow at least `quantity` mints.
pub fn compute_costs(
    strategy: &SaleStrategy,
    quantity: u64,
    allow_list_entry: Option<&AllowListEntry>,
) -> Result<MintCosts> {
    if quantity == 0 {
        return Err(SdkError::InvalidQuantity(quantity));
    }

    match strategy {
        SaleStrategy::FixedPrice(sale) => native_costs(
            quantity,
            sale.price_per_token,
            sale.mint_fee_per_quantity,
        ),
        SaleStrategy::Allowlist(sale) => {
            let entry = allow_list_entry.ok_or(SdkError::AllowListEntryRequired)?;
            if quantity > entry.max_can_mint {
                return Err(SdkError::ExceedsAllowlistCap {
                    requested: quantity,
                    max_can_mint: entry.max_can_mint,
                });
            }
            native_costs(quantity, entry.price, sale.mint_fee_per_quantity)
        }
        SaleStrategy::Erc20(sale) => {
            let purchase_cost_total = times(quantity, sale.price_per_token, "erc20 purchase")?;
            Ok(MintCosts {
                quantity,
                native_price_per_token: U256::zero(),
                mint_fee_total: U256::zero(),
                purchase_cost_total,
                purchase_currency: Some(sale.currency),
                total_cost: U256::zero(),
                erc20_approval: Some(Erc20Approval {
                    token: sale.currency,
                    spender: sale.minter,
                    amount: purchase_cost_total,
                }),
            })
        }
        SaleStrategy::Timed(sale) => native_costs(quantity, U256::zero(), sale.mint_fee),
    }
}

fn native_costs(quantity: u64, price_per_token: U256, mint_fee: U256) -> Result<MintCosts> {
    let native_price_per_token = plus(price_per_token, mint_fee, "price per token")?;
    let purchase_cost_total = times(quantity, price_per_token, "purchase cost")?;
    let mint_fee_total = times(quantity, mint_fee, "mint fee")?;
    Ok(MintCosts {
        quantity,
        native_price_per_token,
        mint_fee_total,
        purchase_cost_total,
        purchase_currency: None,
        total_cost: plus(purchase_cost_total, mint_fee_total, "total cost")?,
        erc20_approval: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllowlistSale, Erc20Sale, FixedPriceSale, TimedSale};
    use ethers::types::{Address, H256};

    fn fixed_price(price: u64, fee: u64) -> SaleStrategy {
        SaleStrategy::FixedPrice(FixedPriceSale {
            minter: Address::repeat_byte(1),
            price_per_token: U256::from(price),
            max_tokens_per_address: 0,
            sale_start: 0,
            sale_end: u64::MAX,
            mint_fee_per_quantity: U256::from(fee),
        })
    }

    fn erc20(price: u64) -> SaleStrategy {
        SaleStrategy::Erc20(Erc20Sale {
            minter: Address::repeat_byte(2),
            currency: Address::repeat_byte(0x83),
            price_per_token: U256::from(price),
            max_tokens_per_address: 0,
            sale_start: 0,
            sale_end: u64::MAX,
        })
    }

    fn allowlist(fee: u64) -> SaleStrategy {
        SaleStrategy::Allowlist(AllowlistSale {
            minter: Address::repeat_byte(3),
            merkle_root: H256::repeat_byte(0xaa),
            sale_start: 0,
            sale_end: u64::MAX,
            mint_fee_per_quantity: U256::from(fee),
        })
    }

    fn timed(mint_fee: u64) -> SaleStrategy {
        SaleStrategy::Timed(TimedSale {
            minter: Address::repeat_byte(4),
            mint_fee: U256::from(mint_fee),
            sale_start: 0,
            sale_end: None,
            erc20_z: Address::repeat_byte(0x20),
            pool: Address::repeat_byte(0x30),
            secondary_activated: false,
            market_countdown: None,
            minimum_market_eth: None,
        })
    }

    fn entry(max_can_mint: u64, price: u64) -> AllowListEntry {
        AllowListEntry {
            user: Address::repeat_byte(9),
            max_can_mint,
            price: U256::from(price),
            proof: vec![H256::repeat_byte(0x01)],
        }
    }

    #[test]
    fn fixed_price_total_includes_fee_per_token() {
        let costs = compute_costs(&fixed_price(100, 10), 3, None).unwrap();
        assert_eq!(costs.total_cost, U256::from(330u64));
        assert_eq!(costs.native_price_per_token, U256::from(110u64));
        assert_eq!(costs.mint_fee_total, U256::from(30u64));
        assert_eq!(costs.purchase_cost_total, U256::from(300u64));
        assert!(costs.erc20_approval.is_none());
    }

    #[test]
    fn erc20_sale_is_free_natively_and_needs_approval() {
        let costs = compute_costs(&erc20(5), 4, None).unwrap();
        assert_eq!(costs.total_cost, U256::zero());
        let approval = costs.erc20_approval.expect("approval required");
        assert_eq!(approval.amount, U256::from(20u64));
        assert_eq!(approval.token, Address::repeat_byte(0x83));
        assert_eq!(approval.spender, Address::repeat_byte(2));
        assert_eq!(costs.purchase_currency, Some(Address::repeat_byte(0x83)));
    }

    #[test]
    fn allowlist_uses_entry_price() {
        let costs = compute_costs(&allowlist(10), 2, Some(&entry(2, 50))).unwrap();
        assert_eq!(costs.total_cost, U256::from(120u64));
    }

    #[test]
    fn allowlist_cap_is_enforced() {
        assert!(matches!(
            compute_costs(&allowlist(10), 3, Some(&entry(2, 50))),
            Err(SdkError::ExceedsAllowlistCap {
                requested: 3,
                max_can_mint: 2
            })
        ));
    }

    #[test]
    fn allowlist_without_entry_fails() {
        assert!(matches!(
            compute_costs(&allowlist(10), 1, None),
            Err(SdkError::AllowListEntryRequired)
        ));
    }

    #[test]
    fn timed_sale_costs_mint_fee_only() {
        let costs = compute_costs(&timed(111), 7, None).unwrap();
        assert_eq!(costs.total_cost, U256::from(777u64));
        assert_eq!(costs.purchase_cost_total, U256::zero());
        assert!(costs.erc20_approval.is_none());
    }

    #[test]
    fn zero_quantity_fails_for_every_type() {
        let strategies = [fixed_price(100, 10), erc20(5), allowlist(10), timed(111)];
        for strategy in &strategies {
            assert!(
                matches!(
                    compute_costs(strategy, 0, Some(&entry(5, 1))),
                    Err(SdkError::InvalidQuantity(0))
                ),
                "expected InvalidQuantity for {}",
                strategy.kind()
            );
        }
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        let strategy = SaleStrategy::FixedPrice(FixedPriceSale {
            minter: Address::zero(),
            price_per_token: U256::MAX,
            max_tokens_per_address: 0,
            sale_start: 0,
            sale_end: u64::MAX,
            mint_fee_per_quantity: U256::zero(),
        });
        assert!(matches!(
            compute_costs(&strategy, 2, None),
            Err(SdkError::AmountOverflow(_))
        ));
    }
}
