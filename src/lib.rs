pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod payments;

pub use auth::TokenIssuer;
pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{Decimal, Email, Product, Shop, TimeMs, User};
pub use error::AppError;
pub use orchestration::{CheckoutOrchestrator, CheckoutReport};
pub use payments::{HttpPaymentProvider, MockPaymentProvider, PaymentProvider};
