//! Domain types for the shop backend.
//!
//! This module provides:
//! - Lossless money handling via the Decimal wrapper
//! - Primitives: TimeMs, Email, Role
//! - The pricing calculator
//! - Shop, Product, cart and sale line records

pub mod cart;
pub mod decimal;
pub mod pricing;
pub mod primitives;
pub mod product;
pub mod sale;
pub mod shop;
pub mod user;

pub use cart::CartLine;
pub use decimal::Decimal;
pub use pricing::{selling_price, PricingError};
pub use primitives::{Email, EmailParseError, Role, TimeMs};
pub use product::{Product, ProductDraft, ProductError, ProductPatch};
pub use sale::{SaleLine, SaleValidationError};
pub use shop::{Shop, ShopDraft, DEFAULT_PRODUCT_LIMIT};
pub use user::{NewUser, ShopLink, User};
