//! Product catalog and checkout product resolution.
//!
//! Checkout requests may name a product directly, name a catalog tier, or
//! name nothing at all; [`resolve_checkout`] maps all three onto a concrete
//! payment-provider product id.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A purchasable product tier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTier {
    pub id: &'static str,
    pub name: &'static str,
    pub product_id: &'static str,
    pub price: &'static str,
    pub description: &'static str,
    /// Credits granted by a one-time purchase. `None` for subscriptions.
    pub credit_amount: Option<i32>,
    pub features: &'static [&'static str],
    pub featured: bool,
}

pub const SUBSCRIPTION_TIERS: [ProductTier; 3] = [
    ProductTier {
        id: "tier-hobby",
        name: "Starter",
        product_id: "prod_69mvcFolFoEov7DpBe6GwL",
        price: "$11",
        description: "Perfect for individual developers and small projects.",
        credit_amount: None,
        features: &[
            "Global authentication system",
            "Database integration",
            "Secure API routes",
            "Community forum access",
        ],
        featured: false,
    },
    ProductTier {
        id: "tier-pro",
        name: "Business",
        product_id: "prod_4EqFWtdtdhTujzZqyK4ab7",
        price: "$29",
        description: "Ideal for growing businesses and development teams.",
        credit_amount: None,
        features: &[
            "Everything in Starter",
            "Multi-currency payments",
            "Priority support",
            "Advanced analytics",
        ],
        featured: true,
    },
    ProductTier {
        id: "tier-enterprise",
        name: "Enterprise",
        product_id: "prod_5DujXQmWCPA9ePifaCZ47G",
        price: "$99",
        description: "For large organizations with advanced requirements.",
        credit_amount: None,
        features: &[
            "Everything in Business",
            "Dedicated account manager",
            "Custom implementation support",
            "Service Level Agreement (SLA)",
        ],
        featured: false,
    },
];

pub const CREDIT_TIERS: [ProductTier; 3] = [
    ProductTier {
        id: "tier-3-credits",
        name: "Basic Package",
        product_id: "prod_7foku98IYiVVBLak0biXZw",
        price: "$9",
        description: "3 credits for trying out name generation.",
        credit_amount: Some(3),
        features: &["3 credits", "No expiration date", "Community support"],
        featured: false,
    },
    ProductTier {
        id: "tier-6-credits",
        name: "Standard Package",
        product_id: "prod_7EF8T3CBj5BqhUaF6M0KAS",
        price: "$13",
        description: "6 credits for regular use.",
        credit_amount: Some(6),
        features: &["6 credits", "No expiration date", "Priority processing"],
        featured: true,
    },
    ProductTier {
        id: "tier-9-credits",
        name: "Premium Package",
        product_id: "prod_7Vns2Qo4Ij4E94IcPcCCd9",
        price: "$29",
        description: "9 credits for heavy use.",
        credit_amount: Some(9),
        features: &["9 credits", "No expiration date", "Premium support"],
        featured: false,
    },
];

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Subscription,
    Credits,
}

impl ProductType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::Subscription => "subscription",
            ProductType::Credits => "credits",
        }
    }

    /// Classify a free-form product type label. Anything that is not exactly
    /// `subscription` is a credits purchase (labels such as
    /// `chinese-name-credits` are common).
    pub fn classify(label: Option<&str>) -> Self {
        let normalized = label.unwrap_or_default().trim().to_lowercase();
        if normalized == "subscription" {
            ProductType::Subscription
        } else {
            ProductType::Credits
        }
    }
}

/// What the client asked to buy.
#[derive(Debug, Clone, Default)]
pub struct CheckoutQuery<'a> {
    pub product_id: Option<&'a str>,
    pub product_type: Option<&'a str>,
    pub tier_id: Option<&'a str>,
}

/// A resolved checkout target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSelection {
    pub product_id: String,
    pub product_type: ProductType,
    /// Catalog credits for the product; only set for credits purchases.
    pub credits: Option<i32>,
}

/// Map a checkout query onto a product.
///
/// Precedence: explicit `product_id`, then `tier_id` in the catalog matching
/// the product type, then the featured (or first) tier of that catalog. The
/// credit amount always comes from the catalog entry of the chosen product.
pub fn resolve_checkout(query: &CheckoutQuery<'_>) -> Result<CheckoutSelection, CoreError> {
    let product_type = ProductType::classify(query.product_type);
    let catalog: &[ProductTier] = match product_type {
        ProductType::Subscription => &SUBSCRIPTION_TIERS,
        ProductType::Credits => &CREDIT_TIERS,
    };

    let explicit = query.product_id.map(str::trim).filter(|p| !p.is_empty());

    let product_id = match explicit {
        Some(id) => id.to_string(),
        None => query
            .tier_id
            .and_then(|tier_id| catalog.iter().find(|t| t.id == tier_id))
            .or_else(|| catalog.iter().find(|t| t.featured))
            .or_else(|| catalog.first())
            .map(|tier| tier.product_id.to_string())
            .ok_or_else(|| {
                CoreError::Validation(
                    "Missing product mapping. Provide productId or configure tiers.".into(),
                )
            })?,
    };

    let credits = match product_type {
        ProductType::Credits => credits_for_product(&product_id),
        ProductType::Subscription => None,
    };

    Ok(CheckoutSelection {
        product_id,
        product_type,
        credits,
    })
}

/// Credits granted by a catalog product id, if it is a credits product.
pub fn credits_for_product(product_id: &str) -> Option<i32> {
    CREDIT_TIERS
        .iter()
        .find(|t| t.product_id == product_id)
        .and_then(|t| t.credit_amount)
}
