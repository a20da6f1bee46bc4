//! In-memory payment provider for tests.

use super::{PaymentError, PaymentIntent, PaymentProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every request and returns deterministic intents.
#[derive(Debug, Clone, Default)]
pub struct MockPaymentProvider {
    requests: Arc<Mutex<Vec<(i64, String)>>>,
    counter: Arc<AtomicUsize>,
    failure: Option<PaymentError>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with `error`.
    pub fn failing_with(mut self, error: PaymentError) -> Self {
        self.failure = Some(error);
        self
    }

    /// `(amount_minor, currency)` of every request so far.
    pub fn requests(&self) -> Vec<(i64, String)> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((amount_minor, currency.to_string()));
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if amount_minor <= 0 {
            return Err(PaymentError::InvalidAmount(amount_minor));
        }

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PaymentIntent {
            id: format!("pi_mock_{}", n),
            client_secret: format!("pi_mock_{}_secret", n),
        })
    }
}
