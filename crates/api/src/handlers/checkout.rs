//! Handlers for the `/checkout` resource.

use axum::extract::State;
use axum::Json;
use mingzi_core::checkout::{
    resolve_checkout, CheckoutQuery, ProductTier, CREDIT_TIERS, SUBSCRIPTION_TIERS,
};
use mingzi_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::payments::CheckoutSession;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /checkout`. Every field is optional; see
/// [`resolve_checkout`] for how they combine.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub product_id: Option<String>,
    pub product_type: Option<String>,
    pub tier_id: Option<String>,
    pub discount_code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

#[derive(Debug, Serialize)]
pub struct TierCatalog {
    pub subscriptions: &'static [ProductTier],
    pub credits: &'static [ProductTier],
}

/// POST /api/v1/checkout
///
/// Resolve the requested product and open a hosted checkout for the caller.
pub async fn create_checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let selection = resolve_checkout(&CheckoutQuery {
        product_id: input.product_id.as_deref(),
        product_type: input.product_type.as_deref(),
        tier_id: input.tier_id.as_deref(),
    })?;

    let email = user
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| CoreError::Validation("User email not found for checkout".into()))?;

    let checkout_url = state
        .payments
        .create_checkout(&CheckoutSession {
            product_id: &selection.product_id,
            product_type: selection.product_type,
            credits: selection.credits,
            user_id: user.user_id,
            email,
            discount_code: input.discount_code.as_deref().filter(|c| !c.is_empty()),
        })
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        product_id = %selection.product_id,
        product_type = selection.product_type.as_str(),
        "Checkout created"
    );

    Ok(Json(CheckoutResponse { checkout_url }))
}

/// GET /api/v1/checkout/tiers
pub async fn list_tiers() -> Json<DataResponse<TierCatalog>> {
    Json(DataResponse {
        data: TierCatalog {
            subscriptions: &SUBSCRIPTION_TIERS,
            credits: &CREDIT_TIERS,
        },
    })
}
