//! Customer credit balances and the credit audit trail.

use mingzi_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `customers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub user_id: UserId,
    pub email: Option<String>,
    pub credits: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Direction of a credit movement, stored in `credits_history.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditDirection {
    Add,
    Subtract,
}

impl CreditDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            CreditDirection::Add => "add",
            CreditDirection::Subtract => "subtract",
        }
    }
}

/// A row from the `credits_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreditHistoryEntry {
    pub id: DbId,
    pub customer_id: DbId,
    pub amount: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub direction: String,
    pub description: String,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

/// Insert DTO for a credit history entry.
#[derive(Debug, Clone)]
pub struct CreateCreditHistory {
    pub customer_id: DbId,
    pub amount: i32,
    pub direction: CreditDirection,
    pub description: String,
    pub metadata: serde_json::Value,
}
