//! Generation batches and the names generated into them.

use mingzi_core::record::NameRecord;
use mingzi_core::types::{BatchId, DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `generation_batches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationBatch {
    pub id: BatchId,
    pub user_id: UserId,
    pub english_name: String,
    pub gender: String,
    pub birth_year: Option<String>,
    pub personality_traits: Option<String>,
    pub name_preferences: Option<String>,
    /// Plan code, `"1"` or `"4"`.
    pub plan_type: String,
    /// Running total across every round of the batch.
    pub credits_used: i32,
    /// Running total across every round of the batch.
    pub names_count: i32,
    /// Latest round number handed out; 1 for a new batch.
    pub current_round: i32,
    pub generation_metadata: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for the first round of a batch.
#[derive(Debug, Clone)]
pub struct CreateBatch {
    pub user_id: UserId,
    pub english_name: String,
    pub gender: String,
    pub birth_year: Option<String>,
    pub personality_traits: Option<String>,
    pub name_preferences: Option<String>,
    pub plan_type: String,
    pub credits_used: i32,
    pub names_count: i32,
    pub generation_metadata: serde_json::Value,
}

/// A row from the `generated_names` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GeneratedName {
    pub id: DbId,
    pub batch_id: BatchId,
    pub chinese_name: String,
    pub pinyin: String,
    pub characters: serde_json::Value,
    pub meaning: String,
    pub cultural_notes: String,
    pub personality_match: String,
    pub style: String,
    /// Zero-based index within its round.
    pub position_in_batch: i32,
    pub generation_round: i32,
    pub created_at: Timestamp,
}

/// Insert DTO for one generated name.
#[derive(Debug, Clone)]
pub struct NewGeneratedName {
    pub chinese_name: String,
    pub pinyin: String,
    pub characters: serde_json::Value,
    pub meaning: String,
    pub cultural_notes: String,
    pub personality_match: String,
    pub style: String,
}

impl From<&NameRecord> for NewGeneratedName {
    fn from(record: &NameRecord) -> Self {
        Self {
            chinese_name: record.chinese.clone(),
            pinyin: record.pinyin.clone(),
            characters: serde_json::to_value(&record.characters)
                .unwrap_or(serde_json::Value::Array(Vec::new())),
            meaning: record.meaning.clone(),
            cultural_notes: record.cultural_notes.clone(),
            personality_match: record.personality_match.clone(),
            style: record.style.as_str().to_string(),
        }
    }
}
