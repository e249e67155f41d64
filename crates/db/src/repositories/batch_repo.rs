//! Repository for the `generation_batches` table.

use mingzi_core::types::{BatchId, UserId};
use sqlx::PgPool;

use crate::models::batch::{CreateBatch, GenerationBatch};

const COLUMNS: &str = "\
    id, user_id, english_name, gender, birth_year, personality_traits, \
    name_preferences, plan_type, credits_used, names_count, current_round, \
    generation_metadata, created_at, updated_at";

pub struct BatchRepo;

impl BatchRepo {
    pub async fn create(pool: &PgPool, input: &CreateBatch) -> Result<GenerationBatch, sqlx::Error> {
        let query = format!(
            "INSERT INTO generation_batches \
                (user_id, english_name, gender, birth_year, personality_traits, \
                 name_preferences, plan_type, credits_used, names_count, generation_metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GenerationBatch>(&query)
            .bind(input.user_id)
            .bind(&input.english_name)
            .bind(&input.gender)
            .bind(&input.birth_year)
            .bind(&input.personality_traits)
            .bind(&input.name_preferences)
            .bind(&input.plan_type)
            .bind(input.credits_used)
            .bind(input.names_count)
            .bind(&input.generation_metadata)
            .fetch_one(pool)
            .await
    }

    /// Find a batch only if it belongs to `user_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: BatchId,
        user_id: UserId,
    ) -> Result<Option<GenerationBatch>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM generation_batches WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, GenerationBatch>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Claim the next round of a batch and add its names and credits to the
    /// running totals. The returned row's `current_round` is the claimed
    /// round; the row lock serializes concurrent continuations.
    pub async fn add_round_totals(
        pool: &PgPool,
        id: BatchId,
        names_added: i32,
        credits_added: i32,
    ) -> Result<Option<GenerationBatch>, sqlx::Error> {
        let query = format!(
            "UPDATE generation_batches SET \
                names_count = names_count + $2, \
                credits_used = credits_used + $3, \
                current_round = current_round + 1, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GenerationBatch>(&query)
            .bind(id)
            .bind(names_added)
            .bind(credits_added)
            .fetch_optional(pool)
            .await
    }
}
