//! Repository for the `customers` and `credits_history` tables.

use mingzi_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::customer::{CreateCreditHistory, CreditHistoryEntry, Customer};

const CUSTOMER_COLUMNS: &str = "id, user_id, email, credits, created_at, updated_at";

const HISTORY_COLUMNS: &str = "id, customer_id, amount, type, description, metadata, created_at";

/// Credit balance operations.
pub struct CustomerRepo;

impl CustomerRepo {
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE user_id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Subtract `amount` credits if the balance covers it.
    ///
    /// The balance check and the decrement are a single conditional
    /// `UPDATE`, so concurrent requests can never overdraw. Returns the row
    /// after deduction, or `None` when the customer is missing or short.
    pub async fn deduct_credits(
        pool: &PgPool,
        user_id: UserId,
        amount: i32,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET credits = credits - $2, updated_at = now() \
             WHERE user_id = $1 AND credits >= $2 \
             RETURNING {CUSTOMER_COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(user_id)
            .bind(amount)
            .fetch_optional(pool)
            .await
    }

    /// Add `amount` credits, creating the customer row on first purchase.
    pub async fn add_credits(
        pool: &PgPool,
        user_id: UserId,
        email: Option<&str>,
        amount: i32,
    ) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers (user_id, email, credits) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO UPDATE SET \
                credits = customers.credits + EXCLUDED.credits, \
                email = COALESCE(EXCLUDED.email, customers.email), \
                updated_at = now() \
             RETURNING {CUSTOMER_COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(user_id)
            .bind(email)
            .bind(amount)
            .fetch_one(pool)
            .await
    }
}

/// Append-only credit audit trail.
pub struct CreditHistoryRepo;

impl CreditHistoryRepo {
    pub async fn record(
        pool: &PgPool,
        input: &CreateCreditHistory,
    ) -> Result<CreditHistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO credits_history (customer_id, amount, type, description, metadata) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {HISTORY_COLUMNS}"
        );
        sqlx::query_as::<_, CreditHistoryEntry>(&query)
            .bind(input.customer_id)
            .bind(input.amount)
            .bind(input.direction.as_str())
            .bind(&input.description)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Newest first.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<CreditHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM credits_history \
             WHERE customer_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, CreditHistoryEntry>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }
}
