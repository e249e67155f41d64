//! Repository for the `ip_rate_limits` table.
//!
//! Days are UTC calendar days regardless of the session time zone.

use sqlx::PgPool;

const TODAY_UTC: &str = "(now() AT TIME ZONE 'UTC')::date";

pub struct IpQuotaRepo;

impl IpQuotaRepo {
    /// Consume one unit of today's quota for `client_ip`.
    ///
    /// Returns the new usage count, or `None` when `limit` was already
    /// reached. The check and increment are a single upsert, so concurrent
    /// requests from one address cannot exceed the limit.
    pub async fn try_consume(
        pool: &PgPool,
        client_ip: &str,
        limit: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        if limit <= 0 {
            return Ok(None);
        }
        let query = format!(
            "INSERT INTO ip_rate_limits (client_ip, usage_date, request_count) \
             VALUES ($1, {TODAY_UTC}, 1) \
             ON CONFLICT (client_ip, usage_date) DO UPDATE SET \
                request_count = ip_rate_limits.request_count + 1, \
                updated_at = now() \
             WHERE ip_rate_limits.request_count < $2 \
             RETURNING request_count"
        );
        sqlx::query_scalar::<_, i32>(&query)
            .bind(client_ip)
            .bind(limit)
            .fetch_optional(pool)
            .await
    }

    /// Today's usage for `client_ip` (0 when unseen).
    pub async fn usage_today(pool: &PgPool, client_ip: &str) -> Result<i32, sqlx::Error> {
        let query = format!(
            "SELECT COALESCE(MAX(request_count), 0) FROM ip_rate_limits \
             WHERE client_ip = $1 AND usage_date = {TODAY_UTC}"
        );
        sqlx::query_scalar::<_, i32>(&query)
            .bind(client_ip)
            .fetch_one(pool)
            .await
    }
}
