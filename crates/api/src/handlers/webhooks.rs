//! Payment provider webhook receiver.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use mingzi_core::checkout::{credits_for_product, ProductType};
use mingzi_core::error::CoreError;
use mingzi_core::signature::verify_webhook_signature;
use mingzi_core::types::UserId;
use mingzi_db::models::customer::{CreateCreditHistory, CreditDirection};
use mingzi_db::repositories::{CreditHistoryRepo, CustomerRepo, WebhookEventRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "creem-signature";

const CHECKOUT_COMPLETED: &str = "checkout.completed";

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "eventType")]
    pub event_type: String,
    #[serde(default)]
    pub object: CheckoutObject,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutObject {
    pub id: Option<String>,
    pub product: Option<ProductRef>,
    pub customer: Option<CustomerRef>,
    #[serde(default)]
    pub metadata: CheckoutMetadata,
}

/// The provider sends either a bare product id or an expanded object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(String),
    Object { id: String },
}

impl ProductRef {
    fn id(&self) -> &str {
        match self {
            ProductRef::Id(id) | ProductRef::Object { id } => id.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CustomerRef {
    pub email: Option<String>,
}

/// Metadata attached when the checkout was created. Any `credits` entry is
/// ignored: the amount granted comes from the product catalog.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutMetadata {
    pub user_id: Option<String>,
    pub product_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/v1/webhooks/creem
///
/// Verifies the signature over the raw body, then applies credit purchases.
/// Events that need no action are acknowledged so the provider stops
/// retrying.
pub async fn creem_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !verify_webhook_signature(&body, signature, state.payments.webhook_secret()) {
        tracing::warn!("Rejected webhook with invalid signature");
        return Err(CoreError::Unauthorized("Invalid webhook signature".into()).into());
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    if event.event_type == CHECKOUT_COMPLETED {
        apply_checkout_completed(&state, &event).await?;
    } else {
        tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring webhook event");
    }

    Ok(Json(WebhookAck { received: true }))
}

/// Credit a completed credits purchase exactly once per event id.
async fn apply_checkout_completed(state: &AppState, event: &WebhookEvent) -> AppResult<()> {
    let checkout = &event.object;
    let metadata = &checkout.metadata;

    if ProductType::classify(metadata.product_type.as_deref()) == ProductType::Subscription {
        tracing::info!(event_id = %event.id, "Subscription checkout completed; no credits to grant");
        return Ok(());
    }

    let Some(user_id) = metadata
        .user_id
        .as_deref()
        .and_then(|raw| UserId::parse_str(raw.trim()).ok())
    else {
        tracing::warn!(event_id = %event.id, "Checkout completed without a usable user_id");
        return Ok(());
    };

    let product_id = checkout.product.as_ref().map(ProductRef::id);
    let Some(credits) = product_id.and_then(credits_for_product) else {
        tracing::warn!(event_id = %event.id, ?product_id, "Checkout completed for unknown credits product");
        return Ok(());
    };

    if !WebhookEventRepo::record_once(&state.pool, &event.id, &event.event_type).await? {
        tracing::info!(event_id = %event.id, "Duplicate webhook delivery ignored");
        return Ok(());
    }

    let email = checkout.customer.as_ref().and_then(|c| c.email.as_deref());
    let customer = match CustomerRepo::add_credits(&state.pool, user_id, email, credits).await {
        Ok(customer) => customer,
        Err(e) => {
            // Let the provider's retry apply the purchase.
            if let Err(forget) = WebhookEventRepo::forget(&state.pool, &event.id).await {
                tracing::error!(error = %forget, event_id = %event.id, "Failed to release webhook event");
            }
            return Err(e.into());
        }
    };

    let history = CreateCreditHistory {
        customer_id: customer.id,
        amount: credits,
        direction: CreditDirection::Add,
        description: "credits_purchase".to_string(),
        metadata: json!({
            "event_id": event.id,
            "checkout_id": checkout.id,
            "product_id": product_id,
            "credits_before": customer.credits - credits,
            "credits_after": customer.credits,
        }),
    };
    if let Err(e) = CreditHistoryRepo::record(&state.pool, &history).await {
        tracing::error!(error = %e, %user_id, "Failed to record credit purchase");
    }

    tracing::info!(%user_id, credits, balance = customer.credits, "Credits purchased");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_expanded_and_bare_products() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "id": "evt_1",
            "eventType": "checkout.completed",
            "object": {
                "product": { "id": "prod_a", "name": "x" },
                "metadata": { "user_id": "u", "credits": "6" }
            }
        }))
        .unwrap();
        assert_eq!(event.object.product.as_ref().map(ProductRef::id), Some("prod_a"));
        assert_eq!(event.object.metadata.user_id.as_deref(), Some("u"));

        let event: WebhookEvent = serde_json::from_value(json!({
            "id": "evt_2",
            "eventType": "checkout.completed",
            "object": { "product": "prod_b", "metadata": { "credits": 3 } }
        }))
        .unwrap();
        assert_eq!(event.object.product.as_ref().map(ProductRef::id), Some("prod_b"));
        assert!(event.object.metadata.user_id.is_none());
    }

    #[test]
    fn missing_object_defaults() {
        let event: WebhookEvent =
            serde_json::from_value(json!({ "id": "evt_3", "eventType": "refund.created" })).unwrap();
        assert!(event.object.product.is_none());
        assert!(event.object.metadata.product_type.is_none());
    }
}
