//! Seller storefront.

use crate::domain::Email;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of products a new shop may list before upgrading.
pub const DEFAULT_PRODUCT_LIMIT: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: String,
    pub owner_email: Email,
    pub owner_name: Option<String>,
    pub name: String,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub product_limit: i64,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied fields for a new shop. Owner and limit are never taken from the body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopDraft {
    pub name: String,
    pub owner_name: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl ShopDraft {
    pub fn into_shop(self, owner_email: Email, now: DateTime<Utc>) -> Shop {
        Shop {
            id: Uuid::new_v4().to_string(),
            owner_email,
            owner_name: self.owner_name,
            name: self.name.trim().to_string(),
            logo_url: self.logo_url,
            description: self.description,
            location: self.location,
            product_limit: DEFAULT_PRODUCT_LIMIT,
            created_at: now,
        }
    }
}
