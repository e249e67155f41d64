/// Row ids of append-only tables (history, logs) are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Users are identified by the UUID in the `sub` claim of their access token.
pub type UserId = uuid::Uuid;

/// Generation batches are keyed by UUID so they can be shared in URLs.
pub type BatchId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
