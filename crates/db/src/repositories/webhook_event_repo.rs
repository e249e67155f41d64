//! Repository for the `webhook_events` table.

use sqlx::PgPool;

pub struct WebhookEventRepo;

impl WebhookEventRepo {
    /// Record an event id. Returns `false` if it was already recorded, so
    /// redelivered webhooks are applied at most once.
    pub async fn record_once(
        pool: &PgPool,
        event_id: &str,
        event_type: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO webhook_events (event_id, event_type) VALUES ($1, $2) \
             ON CONFLICT (event_id) DO NOTHING",
        )
        .bind(event_id)
        .bind(event_type)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Remove a recorded event so a redelivery is processed again.
    pub async fn forget(pool: &PgPool, event_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM webhook_events WHERE event_id = $1")
            .bind(event_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
