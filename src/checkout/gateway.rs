use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::config::StripeConfig;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider error [{status}]: {message}")]
    Provider { status: u16, message: String },
    #[error("provider returned no checkout url")]
    MissingUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub price_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
    pub lines: Vec<CheckoutLine>,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
    pub customer_email: Option<String>,
}

/// Hosted payment page provider. One call creates one session.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        req: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}

pub struct StripeGateway {
    client: Client,
    secret_key: String,
    api_base_url: String,
}

impl StripeGateway {
    pub fn new(cfg: &StripeConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            secret_key: cfg.secret_key.clone(),
            api_base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Stripe takes form-encoded bodies with bracketed keys for nested fields.
fn form_params(req: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), req.success_url.clone()),
        ("cancel_url".to_string(), req.cancel_url.clone()),
    ];
    for (i, line) in req.lines.iter().enumerate() {
        params.push((format!("line_items[{}][price]", i), line.price_id.clone()));
        params.push((
            format!("line_items[{}][quantity]", i),
            line.quantity.to_string(),
        ));
    }
    if let Some(email) = &req.customer_email {
        params.push(("customer_email".to_string(), email.clone()));
    }
    params
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
    customer_email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, req), fields(lines = req.lines.len()))]
    async fn create_checkout_session(
        &self,
        req: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.api_base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form_params(req))
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<StripeErrorEnvelope>(&body)
                .ok()
                .and_then(|env| env.error.message)
                .unwrap_or(body);
            error!(status = status.as_u16(), message = %message, "stripe rejected checkout session");
            return Err(PaymentError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let session: StripeSession =
            serde_json::from_str(&body).map_err(|e| PaymentError::Provider {
                status: status.as_u16(),
                message: format!("unexpected response: {}", e),
            })?;
        debug!(session_id = %session.id, "checkout session created");

        Ok(CheckoutSession {
            url: session.url.ok_or(PaymentError::MissingUrl)?,
            id: session.id,
            customer_email: session.customer_email,
        })
    }
}

#[cfg(test)]
pub use fake::FakeGateway;

#[cfg(test)]
mod fake {
    use super::*;
    use std::sync::Mutex;

    /// Records every request and answers with a canned session.
    #[derive(Default)]
    pub struct FakeGateway {
        pub requests: Mutex<Vec<CheckoutSessionRequest>>,
        pub fail: bool,
    }

    #[async_trait]
    impl PaymentGateway for FakeGateway {
        async fn create_checkout_session(
            &self,
            req: &CheckoutSessionRequest,
        ) -> Result<CheckoutSession, PaymentError> {
            self.requests.lock().unwrap().push(req.clone());
            if self.fail {
                return Err(PaymentError::Provider {
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok(CheckoutSession {
                id: "cs_test_123".into(),
                url: "https://checkout.example/cs_test_123".into(),
                customer_email: req.customer_email.clone(),
            })
        }
    }
}
