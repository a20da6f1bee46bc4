//! Payment-intent provider abstraction.
//!
//! The backend never moves money itself. It asks a provider for a payment
//! intent and hands the client secret back to the browser.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub mod mock;
pub mod stripe;

pub use mock::MockPaymentProvider;
pub use stripe::HttpPaymentProvider;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// Creates payment intents with an external provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync + fmt::Debug {
    /// Create an intent for `amount_minor` units of `currency` (cents for usd).
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError>;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// Connection failure, DNS or timeout.
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),
}
