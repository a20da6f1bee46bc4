//! Pending cart line items.

use crate::domain::{Decimal, Email, Product};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A pending intent to sell `sold_quantity` units of one product.
///
/// `product_cost` and `selling_price` are copied when the line is first
/// created and are never refreshed, so later product edits do not reprice it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub owner_email: Email,
    pub shop_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_cost: Decimal,
    pub selling_price: Decimal,
    pub sold_quantity: i64,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Snapshot a product into a new single-unit line.
    pub fn snapshot(owner_email: &Email, product: &Product, now: DateTime<Utc>) -> Self {
        CartLine {
            owner_email: owner_email.clone(),
            shop_id: product.shop_id.clone(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_cost: product.cost,
            selling_price: product.selling_price,
            sold_quantity: 1,
            added_at: now,
        }
    }
}
