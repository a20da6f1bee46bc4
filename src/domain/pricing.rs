//! Resale price computation.
//!
//! `price_with_tax = cost + cost * 7.5%`, then the profit margin is applied on
//! top and the result is rounded up to a whole unit so the seller never
//! under-recovers cost, tax and margin.

use crate::domain::Decimal;
use thiserror::Error;

/// Value-added tax applied to the cost basis (7.5%).
pub fn tax_rate() -> Decimal {
    Decimal::from_parts(75, 3)
}

/// Share of gross profit a seller keeps after the platform cut (92.5%).
pub fn seller_share() -> Decimal {
    Decimal::from_parts(925, 3)
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("cost must not be negative, got {0}")]
    NegativeCost(Decimal),
    #[error("profit margin must not be negative, got {0}")]
    NegativeMargin(Decimal),
    #[error("price for cost {cost} at {margin}% margin is out of range")]
    Overflow { cost: Decimal, margin: Decimal },
}

/// Cost plus VAT, or `None` if it does not fit in a `Decimal`.
pub fn price_with_tax(cost: Decimal) -> Option<Decimal> {
    cost.checked_mul(tax_rate())?.checked_add(cost)
}

/// Compute the selling price for a product.
///
/// # Errors
/// Rejects a negative cost or a negative profit margin, and inputs whose
/// price is not representable.
pub fn selling_price(cost: Decimal, margin_percent: Decimal) -> Result<Decimal, PricingError> {
    if cost.is_negative() {
        return Err(PricingError::NegativeCost(cost));
    }
    if margin_percent.is_negative() {
        return Err(PricingError::NegativeMargin(margin_percent));
    }

    let overflow = PricingError::Overflow {
        cost,
        margin: margin_percent,
    };
    let with_tax = price_with_tax(cost).ok_or_else(|| overflow.clone())?;
    with_tax
        .checked_mul(margin_percent)
        .and_then(|m| m.checked_div(Decimal::hundred()))
        .and_then(|m| m.checked_add(with_tax))
        .map(|price| price.ceil())
        .ok_or(overflow)
}
