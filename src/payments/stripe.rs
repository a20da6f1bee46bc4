//! Client for a Stripe-compatible payment-intent API.

use super::{PaymentError, PaymentIntent, PaymentProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct HttpPaymentProvider {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl fmt::Debug for HttpPaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPaymentProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: Option<String>,
}

impl HttpPaymentProvider {
    pub fn new(base_url: String, secret_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
        }
    }
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        if amount_minor <= 0 {
            return Err(PaymentError::InvalidAmount(amount_minor));
        }

        let url = format!("{}/v1/payment_intents", self.base_url);
        let amount = amount_minor.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", currency),
            ("payment_method_types[]", "card"),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Payment intent request rejected");
            return Err(PaymentError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: IntentResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;
        let client_secret = body
            .client_secret
            .ok_or_else(|| PaymentError::Parse("response has no client_secret".to_string()))?;

        debug!(intent_id = %body.id, amount_minor, "Payment intent created");
        Ok(PaymentIntent {
            id: body.id,
            client_secret,
        })
    }
}
