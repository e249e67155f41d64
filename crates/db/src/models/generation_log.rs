//! Per-request generation audit log.

use mingzi_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `name_generation_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationLog {
    pub id: DbId,
    pub user_id: UserId,
    pub plan_type: String,
    pub credits_used: i32,
    pub names_generated: i32,
    pub english_name: String,
    pub gender: String,
    pub birth_year: Option<String>,
    pub has_personality_traits: bool,
    pub has_name_preferences: bool,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

/// Insert DTO for a generation log entry.
#[derive(Debug, Clone)]
pub struct CreateGenerationLog {
    pub user_id: UserId,
    pub plan_type: String,
    pub credits_used: i32,
    pub names_generated: i32,
    pub english_name: String,
    pub gender: String,
    pub birth_year: Option<String>,
    pub has_personality_traits: bool,
    pub has_name_preferences: bool,
    pub metadata: serde_json::Value,
}
