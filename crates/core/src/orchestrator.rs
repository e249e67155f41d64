//! Batch orchestration: N sequential provider iterations with fallback.
//!
//! Each iteration builds a prompt that excludes every name accepted so far,
//! calls the provider under a deadline, and parses the answer. Any failure
//! (transport, timeout, parse, schema, duplicate) degrades that single
//! iteration to a lexicon fallback; nothing an iteration does can abort the
//! batch. Cancellation stops the loop and returns the names accepted so far.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::fallback;
use crate::lexicon::{self, SURNAMES};
use crate::parser::{self, ParseError};
use crate::plan::{Gender, PlanType};
use crate::prompt;
use crate::provider::{CompletionProvider, ProviderError};
use crate::record::NameRecord;
use crate::request::GenerationRequest;

/// Default deadline for a single provider call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(45);

/// Why an iteration fell back to lexicon synthesis.
#[derive(Debug, thiserror::Error)]
pub enum IterationFailure {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Provider repeated an already accepted name: {0}")]
    Duplicate(String),
}

/// Result of a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Accepted records in generation order, pairwise distinct by `chinese`.
    pub names: Vec<NameRecord>,
    /// How many of `names` came from fallback synthesis.
    pub fallback_count: usize,
    /// True when the run stopped early because of cancellation.
    pub cancelled: bool,
}

/// Drives name generation for one request.
#[derive(Clone)]
pub struct NameOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    call_timeout: Duration,
}

impl NameOrchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>, call_timeout: Duration) -> Self {
        Self {
            provider,
            call_timeout,
        }
    }

    /// Model identifier of the underlying provider.
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Produce `request.name_count()` names.
    ///
    /// `rng` drives surname hints, seeds and nonces; pass a seeded generator
    /// to reproduce a run.
    pub async fn generate<R: Rng + Send>(
        &self,
        request: &GenerationRequest,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> BatchOutcome {
        let total = request.name_count();
        let mut names: Vec<NameRecord> = Vec::with_capacity(total);
        let mut seen: HashSet<String> = HashSet::with_capacity(total);
        let mut fallback_count = 0;

        for index in 0..total {
            if cancel.is_cancelled() {
                tracing::info!(accepted = names.len(), total, "Generation cancelled");
                return BatchOutcome {
                    names,
                    fallback_count,
                    cancelled: true,
                };
            }

            let built = {
                let existing: Vec<&str> = names.iter().map(|n| n.chinese.as_str()).collect();
                prompt::build_prompt(request, index + 1, total, &existing, rng)
            };
            let hinted_surname = built.surname;
            let completion = built.into_request(request.plan);

            let call = tokio::time::timeout(self.call_timeout, self.provider.complete(&completion));
            let response = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::info!(accepted = names.len(), total, "Generation cancelled mid-call");
                    return BatchOutcome { names, fallback_count, cancelled: true };
                }
                result = call => match result {
                    Ok(inner) => inner,
                    Err(_) => Err(ProviderError::Timeout(self.call_timeout.as_secs())),
                },
            };

            let outcome = response
                .map_err(IterationFailure::from)
                .and_then(|raw| {
                    parser::parse_name_response(&raw, request.plan).map_err(IterationFailure::from)
                })
                .and_then(|record| {
                    if seen.contains(&record.chinese) {
                        Err(IterationFailure::Duplicate(record.chinese))
                    } else {
                        Ok(record)
                    }
                });

            let record = match outcome {
                Ok(record) => record,
                Err(failure) => {
                    // Provider errors rotate through the surname list; parse
                    // failures and duplicates keep the hinted surname.
                    let surname = match failure {
                        IterationFailure::Provider(_) => SURNAMES[index % SURNAMES.len()],
                        _ => hinted_surname,
                    };
                    tracing::warn!(
                        iteration = index + 1,
                        total,
                        surname,
                        error = %failure,
                        "Falling back to lexicon name"
                    );
                    fallback_count += 1;
                    unique_fallback(index, surname, request.gender, request.plan, &seen)
                }
            };

            seen.insert(record.chinese.clone());
            names.push(record);
        }

        BatchOutcome {
            names,
            fallback_count,
            cancelled: false,
        }
    }
}

/// Fallback synthesis that never repeats an accepted name.
///
/// Tries the template for `index` first, then the following templates, then
/// the same templates under the following surnames. A batch holds far fewer
/// names than the template × surname space, so a free slot always exists.
pub fn unique_fallback(
    index: usize,
    surname: &str,
    gender: Gender,
    plan: PlanType,
    seen: &HashSet<String>,
) -> NameRecord {
    let first = fallback::synthesize(index, surname, gender, plan);
    if !seen.contains(&first.chinese) {
        return first;
    }

    let templates = lexicon::given_names(gender).len();
    let start = SURNAMES.iter().position(|s| *s == surname).unwrap_or(0);
    let surnames = std::iter::once(surname)
        .chain((1..SURNAMES.len()).map(|step| SURNAMES[(start + step) % SURNAMES.len()]));

    for candidate_surname in surnames {
        for offset in 0..templates {
            let record = fallback::synthesize(index + offset, candidate_surname, gender, plan);
            if !seen.contains(&record.chinese) {
                return record;
            }
        }
    }

    // Unreachable for any realistic batch size; keep the first candidate.
    first
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::provider::CompletionRequest;
    use crate::record::NameStyle;

    /// Provider replaying a fixed script of answers; `None` means failure.
    struct ScriptedProvider {
        script: Mutex<VecDeque<Option<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Option<&str>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into_iter().map(|s| s.map(String::from)).collect()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(request.user.clone());
            match self.script.lock().unwrap().pop_front().flatten() {
                Some(text) => Ok(text),
                None => Err(ProviderError::Request("scripted failure".into())),
            }
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    /// Provider that never answers.
    struct HangingProvider;

    #[async_trait]
    impl CompletionProvider for HangingProvider {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, ProviderError> {
            std::future::pending().await
        }

        fn model(&self) -> &str {
            "hanging"
        }
    }

    fn name_json(chinese: &str, style: &str) -> String {
        let mut chars = chinese.chars();
        let surname = chars.next().unwrap();
        let given: String = chars.collect();
        format!(
            r#"Here is your name: {{"chinese":"{chinese}","pinyin":"X Y",
               "characters":[{{"character":"{surname}","pinyin":"X"}},
                             {{"character":"{given}","pinyin":"Y"}}],
               "meaning":"m","culturalNotes":"c","personalityMatch":"p","style":"{style}"}}"#
        )
    }

    fn request(plan: PlanType, authenticated: bool) -> GenerationRequest {
        GenerationRequest {
            english_name: "Mia".into(),
            gender: Gender::Female,
            birth_year: None,
            personality_traits: None,
            name_preferences: None,
            plan,
            authenticated,
        }
    }

    fn assert_distinct(names: &[NameRecord]) {
        let set: HashSet<_> = names.iter().map(|n| n.chinese.as_str()).collect();
        assert_eq!(set.len(), names.len(), "names must be pairwise distinct");
    }

    #[tokio::test]
    async fn accepts_provider_names() {
        let a = name_json("林清越", "Standard");
        let b = name_json("周墨然", "Standard");
        let c = name_json("韩星瑶", "Standard");
        let provider =
            ScriptedProvider::new(vec![Some(a.as_str()), Some(b.as_str()), Some(c.as_str())]);
        let orchestrator = NameOrchestrator::new(provider, DEFAULT_CALL_TIMEOUT);

        let outcome = orchestrator
            .generate(
                &request(PlanType::Standard, false),
                &mut StdRng::seed_from_u64(3),
                &CancellationToken::new(),
            )
            .await;

        let chinese: Vec<_> = outcome.names.iter().map(|n| n.chinese.as_str()).collect();
        assert_eq!(chinese, ["林清越", "周墨然", "韩星瑶"]);
        assert_eq!(outcome.fallback_count, 0);
        assert!(!outcome.cancelled);
    }

    #[tokio::test]
    async fn always_failing_provider_yields_full_fallback_batch() {
        let provider = ScriptedProvider::new(vec![]);
        let orchestrator = NameOrchestrator::new(provider, DEFAULT_CALL_TIMEOUT);

        let outcome = orchestrator
            .generate(
                &request(PlanType::Premium, true),
                &mut StdRng::seed_from_u64(9),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(outcome.names.len(), 6);
        assert_eq!(outcome.fallback_count, 6);
        assert_distinct(&outcome.names);
        for (i, name) in outcome.names.iter().enumerate() {
            assert!(!name.chinese.is_empty());
            assert!(!name.pinyin.is_empty());
            assert!((2..=3).contains(&name.characters.len()));
            assert_eq!(name.style, NameStyle::Premium);
            // Provider errors rotate through the surname list.
            assert_eq!(name.surname(), Some(SURNAMES[i]));
        }
    }

    #[tokio::test]
    async fn duplicate_is_replaced_by_fallback() {
        let dup = name_json("林清越", "Standard");
        let provider = ScriptedProvider::new(vec![Some(dup.as_str()); 3]);
        let orchestrator = NameOrchestrator::new(provider, DEFAULT_CALL_TIMEOUT);

        let outcome = orchestrator
            .generate(
                &request(PlanType::Standard, false),
                &mut StdRng::seed_from_u64(5),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(outcome.names.len(), 3);
        assert_eq!(outcome.names[0].chinese, "林清越");
        assert_eq!(outcome.fallback_count, 2);
        assert_eq!(
            outcome.names.iter().filter(|n| n.chinese == "林清越").count(),
            1
        );
        assert_distinct(&outcome.names);
    }

    #[tokio::test]
    async fn unparseable_answer_falls_back_with_hinted_surname() {
        let provider = ScriptedProvider::new(vec![Some("no json here")]);
        let orchestrator = NameOrchestrator::new(provider.clone(), DEFAULT_CALL_TIMEOUT);
        let req = request(PlanType::Standard, false);

        let outcome = orchestrator
            .generate(&req, &mut StdRng::seed_from_u64(11), &CancellationToken::new())
            .await;

        // Replay the first prompt with the same seed to learn the hint.
        let hinted = prompt::build_prompt(&req, 1, 3, &[], &mut StdRng::seed_from_u64(11)).surname;
        assert_eq!(outcome.names[0].surname(), Some(hinted));
        assert_eq!(outcome.names.len(), 3);
    }

    #[tokio::test]
    async fn later_prompts_exclude_accepted_names() {
        let a = name_json("林清越", "Standard");
        let provider = ScriptedProvider::new(vec![Some(a.as_str())]);
        let orchestrator = NameOrchestrator::new(provider.clone(), DEFAULT_CALL_TIMEOUT);

        orchestrator
            .generate(
                &request(PlanType::Standard, false),
                &mut StdRng::seed_from_u64(1),
                &CancellationToken::new(),
            )
            .await;

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(!prompts[0].contains("EXISTING NAMES TO AVOID"));
        assert!(prompts[1].contains("林清越"));
    }

    #[tokio::test]
    async fn style_follows_plan() {
        let a = name_json("林清越", "Premium");
        let provider = ScriptedProvider::new(vec![Some(a.as_str())]);
        let orchestrator = NameOrchestrator::new(provider, DEFAULT_CALL_TIMEOUT);

        let outcome = orchestrator
            .generate(
                &request(PlanType::Standard, false),
                &mut StdRng::seed_from_u64(1),
                &CancellationToken::new(),
            )
            .await;

        assert!(outcome.names.iter().all(|n| n.style == NameStyle::Standard));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_counts_as_provider_failure() {
        let orchestrator =
            NameOrchestrator::new(Arc::new(HangingProvider), Duration::from_millis(50));

        let outcome = orchestrator
            .generate(
                &request(PlanType::Standard, false),
                &mut StdRng::seed_from_u64(1),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(outcome.names.len(), 3);
        assert_eq!(outcome.fallback_count, 3);
    }

    #[tokio::test]
    async fn cancelled_before_start_returns_nothing() {
        let provider = ScriptedProvider::new(vec![]);
        let orchestrator = NameOrchestrator::new(provider, DEFAULT_CALL_TIMEOUT);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = orchestrator
            .generate(
                &request(PlanType::Standard, true),
                &mut StdRng::seed_from_u64(1),
                &cancel,
            )
            .await;

        assert!(outcome.cancelled);
        assert!(outcome.names.is_empty());
    }

    #[tokio::test]
    async fn cancel_mid_call_stops_batch() {
        let orchestrator = NameOrchestrator::new(Arc::new(HangingProvider), DEFAULT_CALL_TIMEOUT);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let outcome = orchestrator
            .generate(
                &request(PlanType::Standard, true),
                &mut StdRng::seed_from_u64(1),
                &cancel,
            )
            .await;

        assert!(outcome.cancelled);
        assert!(outcome.names.is_empty());
    }

    #[test]
    fn unique_fallback_skips_taken_names() {
        let taken = fallback::synthesize(1, "李", Gender::Female, PlanType::Standard);
        let seen: HashSet<String> = [taken.chinese.clone()].into_iter().collect();

        let record = unique_fallback(1, "李", Gender::Female, PlanType::Standard, &seen);
        assert_ne!(record.chinese, taken.chinese);
        assert_eq!(record.surname(), Some("李"));
    }

    #[test]
    fn unique_fallback_rotates_surname_when_templates_exhausted() {
        let seen: HashSet<String> = (0..6)
            .map(|i| fallback::synthesize(i, "王", Gender::Male, PlanType::Standard).chinese)
            .collect();

        let record = unique_fallback(0, "王", Gender::Male, PlanType::Standard, &seen);
        assert!(!seen.contains(&record.chinese));
        assert_eq!(record.surname(), Some("李"));
    }
}
