//! Repository for the `name_generation_logs` table.

use mingzi_core::types::UserId;
use sqlx::PgPool;

use crate::models::generation_log::{CreateGenerationLog, GenerationLog};

const COLUMNS: &str = "\
    id, user_id, plan_type, credits_used, names_generated, english_name, gender, \
    birth_year, has_personality_traits, has_name_preferences, metadata, created_at";

pub struct GenerationLogRepo;

impl GenerationLogRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateGenerationLog,
    ) -> Result<GenerationLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO name_generation_logs \
                (user_id, plan_type, credits_used, names_generated, english_name, gender, \
                 birth_year, has_personality_traits, has_name_preferences, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GenerationLog>(&query)
            .bind(input.user_id)
            .bind(&input.plan_type)
            .bind(input.credits_used)
            .bind(input.names_generated)
            .bind(&input.english_name)
            .bind(&input.gender)
            .bind(&input.birth_year)
            .bind(input.has_personality_traits)
            .bind(input.has_name_preferences)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<GenerationLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM name_generation_logs \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, GenerationLog>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
