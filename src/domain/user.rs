//! User accounts.

use crate::domain::{Decimal, Email, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: Email,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
    pub shop_id: Option<String>,
    pub shop_name: Option<String>,
    pub shop_logo: Option<String>,
    /// Accumulated platform income; only reported for admins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Registration payload. Role and income are never accepted from clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: Email,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// Shop linkage fields merged into a user record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopLink {
    pub shop_id: Option<String>,
    pub shop_name: Option<String>,
    pub shop_logo: Option<String>,
}

impl ShopLink {
    pub fn is_empty(&self) -> bool {
        self.shop_id.is_none() && self.shop_name.is_none() && self.shop_logo.is_none()
    }
}
