//! Repository for the `generated_names` table.

use mingzi_core::types::BatchId;
use sqlx::PgPool;

use crate::models::batch::{GeneratedName, NewGeneratedName};

const COLUMNS: &str = "\
    id, batch_id, chinese_name, pinyin, characters, meaning, cultural_notes, \
    personality_match, style, position_in_batch, generation_round, created_at";

const INSERT_COLUMNS: &str = "\
    batch_id, chinese_name, pinyin, characters, meaning, cultural_notes, \
    personality_match, style, position_in_batch, generation_round";

const INSERT_COLUMN_COUNT: usize = 10;

pub struct GeneratedNameRepo;

impl GeneratedNameRepo {
    /// Insert one round of names with a single multi-row INSERT. Positions
    /// are the zero-based slice indices.
    pub async fn insert_round(
        pool: &PgPool,
        batch_id: BatchId,
        round: i32,
        names: &[NewGeneratedName],
    ) -> Result<Vec<GeneratedName>, sqlx::Error> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = format!("INSERT INTO generated_names ({INSERT_COLUMNS}) VALUES ");
        let mut param_idx = 1u32;
        for row in 0..names.len() {
            if row > 0 {
                query.push_str(", ");
            }
            query.push('(');
            for col in 0..INSERT_COLUMN_COUNT {
                if col > 0 {
                    query.push_str(", ");
                }
                query.push_str(&format!("${param_idx}"));
                param_idx += 1;
            }
            query.push(')');
        }
        query.push_str(&format!(" RETURNING {COLUMNS}"));

        let mut q = sqlx::query_as::<_, GeneratedName>(&query);
        for (position, name) in names.iter().enumerate() {
            q = q
                .bind(batch_id)
                .bind(&name.chinese_name)
                .bind(&name.pinyin)
                .bind(&name.characters)
                .bind(&name.meaning)
                .bind(&name.cultural_notes)
                .bind(&name.personality_match)
                .bind(&name.style)
                .bind(position as i32)
                .bind(round);
        }
        q.fetch_all(pool).await
    }

    /// All names in a batch, ordered by round then position.
    pub async fn list_for_batch(
        pool: &PgPool,
        batch_id: BatchId,
    ) -> Result<Vec<GeneratedName>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generated_names WHERE batch_id = $1 \
             ORDER BY generation_round, position_in_batch"
        );
        sqlx::query_as::<_, GeneratedName>(&query)
            .bind(batch_id)
            .fetch_all(pool)
            .await
    }
}
