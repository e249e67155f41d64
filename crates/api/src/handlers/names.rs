//! Handler for `POST /chinese-names/generate`.

use axum::extract::State;
use axum::Json;
use mingzi_core::error::CoreError;
use mingzi_core::plan::{Gender, PlanType};
use mingzi_core::record::NameRecord;
use mingzi_core::request::GenerationRequest;
use mingzi_core::types::{BatchId, Timestamp, UserId};
use mingzi_db::models::batch::{CreateBatch, GenerationBatch, NewGeneratedName};
use mingzi_db::models::customer::{CreateCreditHistory, CreditDirection};
use mingzi_db::models::generation_log::CreateGenerationLog;
use mingzi_db::repositories::{
    BatchRepo, CreditHistoryRepo, CustomerRepo, GeneratedNameRepo, GenerationLogRepo,
    IpQuotaRepo,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::client_ip::ClientIp;
use crate::state::AppState;

const MISSING_FIELDS: &str = "Missing required fields: englishName, gender, and planType";
const UNKNOWN_BATCH: &str = "Invalid batch ID or batch not found";
const CREDIT_DESCRIPTION: &str = "chinese_name_generation";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /chinese-names/generate`.
///
/// Every field is optional at the serde level so that missing fields produce
/// the documented 400 instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateNamesRequest {
    pub english_name: Option<String>,
    pub gender: Option<String>,
    /// Accepts numbers as well as strings.
    pub birth_year: Option<serde_json::Value>,
    pub personality_traits: Option<String>,
    pub name_preferences: Option<String>,
    /// `"1"`, `"4"`, `1`, `4`, `"Standard"` or `"Premium"`.
    pub plan_type: Option<serde_json::Value>,
    #[serde(default)]
    pub continue_batch: bool,
    pub batch_id: Option<String>,
}

impl GenerateNamesRequest {
    /// Check required fields and build the domain request.
    pub fn to_generation_request(&self, authenticated: bool) -> Result<GenerationRequest, CoreError> {
        let english_name = non_blank(self.english_name.as_deref());
        let gender = non_blank(self.gender.as_deref());
        let plan = self.plan_type.as_ref().and_then(value_text);

        let (Some(english_name), Some(gender), Some(plan)) = (english_name, gender, plan) else {
            return Err(CoreError::Validation(MISSING_FIELDS.into()));
        };

        Ok(GenerationRequest {
            english_name: english_name.to_string(),
            gender: Gender::parse(gender)?,
            birth_year: self.birth_year.as_ref().and_then(value_text),
            personality_traits: self.personality_traits.clone(),
            name_preferences: self.name_preferences.clone(),
            plan: PlanType::parse(&plan)?,
            authenticated,
        })
    }

    /// Batch to continue, when continuation was requested with an id.
    fn continuation(&self) -> Result<Option<BatchId>, CoreError> {
        if !self.continue_batch {
            return Ok(None);
        }
        match non_blank(self.batch_id.as_deref()) {
            None => Ok(None),
            Some(raw) => BatchId::parse_str(raw)
                .map(Some)
                .map_err(|_| CoreError::Validation(UNKNOWN_BATCH.into())),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Render a JSON string or number as trimmed text.
fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => non_blank(Some(s)).map(str::to_string),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Summary of the batch the names were stored in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub id: BatchId,
    pub english_name: String,
    pub gender: String,
    pub plan_type: String,
    pub total_names_generated: i32,
    pub total_credits_used: i32,
    pub created_at: Timestamp,
}

impl From<GenerationBatch> for BatchSummary {
    fn from(batch: GenerationBatch) -> Self {
        Self {
            id: batch.id,
            english_name: batch.english_name,
            gender: batch.gender,
            plan_type: batch.plan_type,
            total_names_generated: batch.names_count,
            total_credits_used: batch.credits_used,
            created_at: batch.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateNamesResponse {
    pub names: Vec<NameRecord>,
    pub total: usize,
    pub plan_type: PlanType,
    pub credits_used: i32,
    pub batch_id: Option<BatchId>,
    pub generation_round: i32,
    pub is_continuation: bool,
    pub batch: Option<BatchSummary>,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/v1/chinese-names/generate
///
/// Anonymous callers get 3 names against a per-IP daily quota. Signed-in
/// callers get 6 names for 1 (Standard) or 4 (Premium) credits, stored in a
/// batch that later calls may continue.
pub async fn generate_names(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    ClientIp(client_ip): ClientIp,
    Json(input): Json<GenerateNamesRequest>,
) -> AppResult<Json<GenerateNamesResponse>> {
    let request = input.to_generation_request(user.is_some())?;

    // 1. Admission: continuation lookup and credits, or the anonymous quota.
    let continued = match &user {
        Some(user) => {
            let continued = match input.continuation()? {
                Some(batch_id) => Some(
                    BatchRepo::find_owned(&state.pool, batch_id, user.user_id)
                        .await?
                        .ok_or_else(|| CoreError::Validation(UNKNOWN_BATCH.into()))?,
                ),
                None => None,
            };
            charge_credits(&state, user, request.plan).await?;
            continued
        }
        None => {
            consume_anonymous_quota(&state, &client_ip).await?;
            None
        }
    };

    // 2. Generation.
    let mut rng = StdRng::from_os_rng();
    let cancel = state.shutdown.child_token();
    let outcome = state.orchestrator.generate(&request, &mut rng, &cancel).await;
    tracing::info!(
        authenticated = user.is_some(),
        plan = %request.plan,
        names = outcome.names.len(),
        fallbacks = outcome.fallback_count,
        cancelled = outcome.cancelled,
        "Name batch generated"
    );

    // 3. Best-effort persistence. `isContinuation` echoes the caller's flag
    // even when no batch was continued.
    let is_continuation = input.continue_batch;
    let stored = match &user {
        Some(user) => {
            let round = RoundRequest {
                continued,
                is_continuation,
            };
            persist_generation(&state, user.user_id, &request, &outcome.names, round).await
        }
        None => StoredBatch::default(),
    };

    let total = outcome.names.len();
    let message = if is_continuation {
        format!(
            "Generated {total} more names for your batch (Round {})!",
            stored.round
        )
    } else {
        format!("Generated {total} unique Chinese names successfully!")
    };

    Ok(Json(GenerateNamesResponse {
        total,
        names: outcome.names,
        plan_type: request.plan,
        credits_used: if user.is_some() {
            request.plan.credit_cost()
        } else {
            0
        },
        batch_id: stored.batch.as_ref().map(|b| b.id),
        generation_round: stored.round,
        is_continuation,
        batch: stored.batch.map(BatchSummary::from),
        message,
    }))
}

// ---------------------------------------------------------------------------
// Admission
// ---------------------------------------------------------------------------

/// Deduct the plan's cost atomically; record the movement best-effort.
async fn charge_credits(state: &AppState, user: &AuthUser, plan: PlanType) -> AppResult<()> {
    let cost = plan.credit_cost();
    let customer = CustomerRepo::deduct_credits(&state.pool, user.user_id, cost)
        .await?
        .ok_or_else(|| {
            CoreError::InsufficientCredits(
                "Insufficient credits. Please purchase more credits.".into(),
            )
        })?;

    let history = CreateCreditHistory {
        customer_id: customer.id,
        amount: cost,
        direction: CreditDirection::Subtract,
        description: CREDIT_DESCRIPTION.to_string(),
        metadata: json!({
            "operation": CREDIT_DESCRIPTION,
            "credits_before": customer.credits + cost,
            "credits_after": customer.credits,
            "plan_type": plan.code(),
        }),
    };
    if let Err(e) = CreditHistoryRepo::record(&state.pool, &history).await {
        tracing::error!(error = %e, user_id = %user.user_id, "Failed to record credit transaction");
    }
    Ok(())
}

async fn consume_anonymous_quota(state: &AppState, client_ip: &str) -> AppResult<()> {
    let limit = state.config.free_daily_generations;
    let used = IpQuotaRepo::try_consume(&state.pool, client_ip, limit)
        .await
        .map_err(|e| AppError::InternalError(format!("Unable to verify rate limit: {e}")))?;

    match used {
        Some(count) => {
            tracing::debug!(client_ip, count, limit, "Anonymous quota consumed");
            Ok(())
        }
        None => Err(CoreError::QuotaExceeded(format!(
            "Free generation limit reached. You can generate {} free names per day. \
             Please sign in for unlimited access!",
            limit.max(0) as usize * mingzi_core::request::ANONYMOUS_NAME_COUNT
        ))
        .into()),
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Where a round of names ended up.
#[derive(Debug)]
struct StoredBatch {
    batch: Option<GenerationBatch>,
    round: i32,
}

impl Default for StoredBatch {
    fn default() -> Self {
        Self {
            batch: None,
            round: 1,
        }
    }
}

/// The batch a round belongs to, as resolved during admission.
struct RoundRequest {
    /// Owned batch to append to; `None` starts a new batch.
    continued: Option<GenerationBatch>,
    /// The caller's `continueBatch` flag.
    is_continuation: bool,
}

/// Store the round, its batch bookkeeping and the generation log.
///
/// Failures are logged and never surface: the caller has already paid and
/// receives the names regardless.
async fn persist_generation(
    state: &AppState,
    user_id: UserId,
    request: &GenerationRequest,
    names: &[NameRecord],
    round: RoundRequest,
) -> StoredBatch {
    let pool = &state.pool;
    let names_count = names.len() as i32;
    let cost = request.plan.credit_cost();
    let is_continuation = round.is_continuation;

    let stored = match round.continued {
        Some(batch) => match BatchRepo::add_round_totals(pool, batch.id, names_count, cost).await {
            Ok(Some(updated)) => StoredBatch {
                round: updated.current_round,
                batch: Some(updated),
            },
            Ok(None) => {
                tracing::warn!(batch_id = %batch.id, "Batch disappeared before its round was stored");
                StoredBatch {
                    batch: None,
                    round: batch.current_round + 1,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, batch_id = %batch.id, "Failed to claim generation round");
                StoredBatch {
                    batch: None,
                    round: batch.current_round + 1,
                }
            }
        },
        None => {
            let input = CreateBatch {
                user_id,
                english_name: request.english_name.clone(),
                gender: request.gender.as_str().to_string(),
                birth_year: request.birth_year.clone(),
                personality_traits: request.personality_traits.clone(),
                name_preferences: request.name_preferences.clone(),
                plan_type: request.plan.code().to_string(),
                credits_used: cost,
                names_count,
                generation_metadata: json!({
                    "generation_timestamp": chrono::Utc::now(),
                    "ai_model": state.orchestrator.model(),
                    "temperature": request.plan.sampling().temperature,
                }),
            };
            match BatchRepo::create(pool, &input).await {
                Ok(batch) => StoredBatch {
                    batch: Some(batch),
                    round: 1,
                },
                Err(e) => {
                    tracing::error!(error = %e, %user_id, "Failed to create generation batch");
                    StoredBatch::default()
                }
            }
        }
    };

    if let Some(batch) = &stored.batch {
        let rows: Vec<NewGeneratedName> = names.iter().map(NewGeneratedName::from).collect();
        if let Err(e) = GeneratedNameRepo::insert_round(pool, batch.id, stored.round, &rows).await {
            tracing::error!(error = %e, batch_id = %batch.id, "Failed to save generated names");
        }
    }

    let log = CreateGenerationLog {
        user_id,
        plan_type: request.plan.code().to_string(),
        credits_used: cost,
        names_generated: names_count,
        english_name: request.english_name.clone(),
        gender: request.gender.as_str().to_string(),
        birth_year: request.birth_year.clone(),
        has_personality_traits: request.effective_traits().is_some(),
        has_name_preferences: request.effective_preferences().is_some(),
        metadata: json!({
            "generation_details": {
                "name_count": names_count,
                "generation_timestamp": chrono::Utc::now(),
                "batch_id": stored.batch.as_ref().map(|b| b.id),
                "generation_round": stored.round,
                "is_continuation": is_continuation,
            }
        }),
    };
    if let Err(e) = GenerationLogRepo::create(pool, &log).await {
        tracing::error!(error = %e, %user_id, "Failed to write generation log");
    }

    stored
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn body(value: serde_json::Value) -> GenerateNamesRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_fields_are_rejected_together() {
        for value in [
            json!({ "gender": "male", "planType": "1" }),
            json!({ "englishName": "  ", "gender": "male", "planType": "1" }),
            json!({ "englishName": "Ann", "planType": "1" }),
            json!({ "englishName": "Ann", "gender": "female" }),
        ] {
            let err = body(value).to_generation_request(false).unwrap_err();
            assert_matches!(err, CoreError::Validation(msg) if msg == MISSING_FIELDS);
        }
    }

    #[test]
    fn plan_accepts_numbers_and_names() {
        for (plan, expected) in [
            (json!("1"), PlanType::Standard),
            (json!(4), PlanType::Premium),
            (json!("Premium"), PlanType::Premium),
        ] {
            let request = body(json!({ "englishName": "Ann", "gender": "female", "planType": plan }))
                .to_generation_request(true)
                .unwrap();
            assert_eq!(request.plan, expected);
        }
    }

    #[test]
    fn unknown_plan_or_gender_is_validation_error() {
        let err = body(json!({ "englishName": "Ann", "gender": "female", "planType": "2" }))
            .to_generation_request(true)
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));

        let err = body(json!({ "englishName": "Ann", "gender": "robot", "planType": "1" }))
            .to_generation_request(true)
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn numeric_birth_year_is_text() {
        let request = body(json!({
            "englishName": "Ann", "gender": "female", "planType": "1", "birthYear": 1990
        }))
        .to_generation_request(false)
        .unwrap();
        assert_eq!(request.birth_year.as_deref(), Some("1990"));
        assert!(!request.authenticated);
    }

    #[test]
    fn continuation_requires_flag_and_valid_id() {
        let id = uuid::Uuid::new_v4();
        let input = body(json!({ "continueBatch": true, "batchId": id.to_string() }));
        assert_eq!(input.continuation().unwrap(), Some(id));

        let input = body(json!({ "continueBatch": false, "batchId": id.to_string() }));
        assert_eq!(input.continuation().unwrap(), None);

        let input = body(json!({ "continueBatch": true }));
        assert_eq!(input.continuation().unwrap(), None);

        let input = body(json!({ "continueBatch": true, "batchId": "not-a-uuid" }));
        assert_matches!(input.continuation(), Err(CoreError::Validation(msg)) if msg == UNKNOWN_BATCH);
    }
}
