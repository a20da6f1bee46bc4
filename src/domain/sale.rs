//! Committed sale line items.

use crate::domain::{CartLine, Decimal, Email};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Immutable record of a committed sale of one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub shop_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_cost: Decimal,
    pub selling_price: Decimal,
    pub sold_quantity: i64,
    /// Account that performed the sale.
    pub sold_by: Email,
    /// Display name of the seller at sale time, if known.
    pub seller_name: Option<String>,
    pub sold_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SaleValidationError {
    #[error("sale of product {product_id} has non-positive quantity {quantity}")]
    NonPositiveQuantity { product_id: String, quantity: i64 },
    #[error("sale of product {product_id} has a negative price")]
    NegativePrice { product_id: String },
    #[error("sale line is missing a product id")]
    MissingProduct,
}

impl SaleLine {
    pub fn from_cart(
        line: &CartLine,
        sold_by: &Email,
        seller_name: Option<&str>,
        sold_at: DateTime<Utc>,
    ) -> Self {
        SaleLine {
            shop_id: line.shop_id.clone(),
            product_id: line.product_id.clone(),
            product_name: line.product_name.clone(),
            product_cost: line.product_cost,
            selling_price: line.selling_price,
            sold_quantity: line.sold_quantity,
            sold_by: sold_by.clone(),
            seller_name: seller_name.map(str::to_string),
            sold_at,
        }
    }

    /// # Errors
    /// Returns the first rule the line violates.
    pub fn validate(&self) -> Result<(), SaleValidationError> {
        if self.product_id.trim().is_empty() {
            return Err(SaleValidationError::MissingProduct);
        }
        if self.sold_quantity <= 0 {
            return Err(SaleValidationError::NonPositiveQuantity {
                product_id: self.product_id.clone(),
                quantity: self.sold_quantity,
            });
        }
        if self.selling_price.is_negative() || self.product_cost.is_negative() {
            return Err(SaleValidationError::NegativePrice {
                product_id: self.product_id.clone(),
            });
        }
        Ok(())
    }

    /// `sold_quantity * selling_price`, saturating at the `Decimal` bounds.
    pub fn revenue(&self) -> Decimal {
        Decimal::from_int(self.sold_quantity).saturating_mul(self.selling_price)
    }

    /// `sold_quantity * product_cost`, saturating at the `Decimal` bounds.
    pub fn invested(&self) -> Decimal {
        Decimal::from_int(self.sold_quantity).saturating_mul(self.product_cost)
    }
}
