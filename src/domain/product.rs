//! Sellable products with cost-derived pricing.

use crate::domain::{pricing, Decimal, Email, PricingError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub shop_id: String,
    pub owner_email: Email,
    pub name: String,
    pub image_url: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub cost: Decimal,
    pub profit_margin: Decimal,
    /// Always derived from `cost` and `profit_margin`.
    pub selling_price: Decimal,
    /// Units on hand. May go negative, see `Repository::apply_sale`.
    pub quantity: i64,
    pub sales_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("quantity must not be negative, got {0}")]
    NegativeQuantity(i64),
    #[error("product name must not be empty")]
    EmptyName,
}

/// Client input for a new product. There is deliberately no selling price field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub image_url: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub cost: Decimal,
    pub profit_margin: Decimal,
    pub quantity: i64,
}

impl ProductDraft {
    /// Validate the draft and price it.
    ///
    /// # Errors
    /// Returns an error for an empty name, negative quantity, cost or margin.
    pub fn into_product(
        self,
        shop_id: &str,
        owner_email: &Email,
        now: DateTime<Utc>,
    ) -> Result<Product, ProductError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ProductError::EmptyName);
        }
        if self.quantity < 0 {
            return Err(ProductError::NegativeQuantity(self.quantity));
        }
        let selling_price = pricing::selling_price(self.cost, self.profit_margin)?;

        Ok(Product {
            id: Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            owner_email: owner_email.clone(),
            name,
            image_url: self.image_url,
            location: self.location,
            description: self.description,
            cost: self.cost,
            profit_margin: self.profit_margin,
            selling_price,
            quantity: self.quantity,
            sales_count: 0,
            created_at: now,
        })
    }
}

/// Partial update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub cost: Option<Decimal>,
    pub profit_margin: Option<Decimal>,
    pub quantity: Option<i64>,
}

impl Product {
    /// Apply a patch and recompute the selling price from the resulting cost basis.
    ///
    /// The product is left untouched when validation fails.
    ///
    /// # Errors
    /// Same validation rules as [`ProductDraft::into_product`].
    pub fn apply_patch(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        let name = match patch.name {
            Some(n) if n.trim().is_empty() => return Err(ProductError::EmptyName),
            Some(n) => n.trim().to_string(),
            None => self.name.clone(),
        };
        let quantity = patch.quantity.unwrap_or(self.quantity);
        if quantity < 0 {
            return Err(ProductError::NegativeQuantity(quantity));
        }
        let cost = patch.cost.unwrap_or(self.cost);
        let profit_margin = patch.profit_margin.unwrap_or(self.profit_margin);
        let selling_price = pricing::selling_price(cost, profit_margin)?;

        self.name = name;
        self.quantity = quantity;
        self.cost = cost;
        self.profit_margin = profit_margin;
        self.selling_price = selling_price;
        if patch.image_url.is_some() {
            self.image_url = patch.image_url;
        }
        if patch.location.is_some() {
            self.location = patch.location;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        Ok(())
    }
}
