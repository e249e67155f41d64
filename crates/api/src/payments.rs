//! Client for the Creem payment provider's checkout API.

use std::time::Duration;

use mingzi_core::checkout::ProductType;
use mingzi_core::types::UserId;
use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "https://api.creem.io";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Payment provider settings.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub api_url: String,
    pub api_key: String,
    /// Secret used to verify webhook signatures. Empty rejects every webhook.
    pub webhook_secret: String,
    /// Where the provider redirects after a successful payment.
    pub success_url: Option<String>,
}

impl PaymentConfig {
    /// Load payment configuration from environment variables.
    ///
    /// | Env Var                | Default                |
    /// |------------------------|------------------------|
    /// | `CREEM_API_URL`        | `https://api.creem.io` |
    /// | `CREEM_API_KEY`        | empty                  |
    /// | `CREEM_WEBHOOK_SECRET` | empty                  |
    /// | `CHECKOUT_SUCCESS_URL` | unset                  |
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("CREEM_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.into())
                .trim_end_matches('/')
                .to_string(),
            api_key: std::env::var("CREEM_API_KEY").unwrap_or_default(),
            webhook_secret: std::env::var("CREEM_WEBHOOK_SECRET").unwrap_or_default(),
            success_url: std::env::var("CHECKOUT_SUCCESS_URL")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment provider API key is not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Payment provider API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Payment provider response had no checkout URL")]
    MissingCheckoutUrl,
}

/// A checkout to open for a signed-in user.
#[derive(Debug, Clone)]
pub struct CheckoutSession<'a> {
    pub product_id: &'a str,
    pub product_type: ProductType,
    pub credits: Option<i32>,
    pub user_id: UserId,
    pub email: &'a str,
    pub discount_code: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CreateCheckoutBody<'a> {
    product_id: &'a str,
    request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    success_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discount_code: Option<&'a str>,
    customer: CustomerRef<'a>,
    metadata: CheckoutMetadata,
}

#[derive(Debug, Serialize)]
struct CustomerRef<'a> {
    email: &'a str,
}

/// Echoed back in webhook payloads so purchases can be credited.
#[derive(Debug, Serialize)]
struct CheckoutMetadata {
    user_id: String,
    product_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    credits: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct CreateCheckoutResponse {
    checkout_url: Option<String>,
}

pub struct CreemClient {
    client: reqwest::Client,
    config: PaymentConfig,
}

impl CreemClient {
    pub fn new(config: PaymentConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    pub fn webhook_secret(&self) -> &str {
        &self.config.webhook_secret
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Create a hosted checkout and return its URL.
    pub async fn create_checkout(
        &self,
        session: &CheckoutSession<'_>,
    ) -> Result<String, PaymentError> {
        if !self.is_configured() {
            return Err(PaymentError::NotConfigured);
        }

        let body = CreateCheckoutBody {
            product_id: session.product_id,
            request_id: uuid::Uuid::new_v4().to_string(),
            success_url: self.config.success_url.as_deref(),
            discount_code: session.discount_code,
            customer: CustomerRef {
                email: session.email,
            },
            metadata: CheckoutMetadata {
                user_id: session.user_id.to_string(),
                product_type: session.product_type.as_str(),
                credits: session.credits,
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/checkouts", self.config.api_url))
            .header("x-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PaymentError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CreateCheckoutResponse = response.json().await?;
        parsed
            .checkout_url
            .filter(|url| !url.is_empty())
            .ok_or(PaymentError::MissingCheckoutUrl)
    }
}
