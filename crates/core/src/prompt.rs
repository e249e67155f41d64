//! Prompt construction for one generation iteration.
//!
//! Every prompt pins a surname, embeds a random seed and nonce so the
//! provider cannot serve a cached completion, lists the names already
//! accepted in this batch, and demands a single JSON object back.

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::lexicon::{OVERUSED_NAMES, SURNAMES};
use crate::plan::PlanType;
use crate::provider::CompletionRequest;
use crate::request::GenerationRequest;

/// Length of the per-prompt nonce.
const NONCE_LEN: usize = 13;

/// Output of [`build_prompt`].
#[derive(Debug, Clone)]
pub struct BuiltPrompt {
    pub system: String,
    pub user: String,
    /// Surname the provider was told to use. Reused for the fallback when
    /// the provider answer cannot be parsed.
    pub surname: &'static str,
    pub seed: u32,
    pub nonce: String,
}

impl BuiltPrompt {
    /// Pair the prompt with the plan's sampling parameters.
    pub fn into_request(self, plan: PlanType) -> CompletionRequest {
        CompletionRequest {
            system: self.system,
            user: self.user,
            sampling: plan.sampling(),
        }
    }
}

/// System instruction shared by every iteration of a plan tier.
pub fn system_instruction(plan: PlanType) -> String {
    let flavour = if plan.is_premium() {
        "premium personalized"
    } else {
        "standard personalized"
    };
    format!(
        "You are a Chinese naming expert specializing in {flavour} name generation. \
         IMPORTANT: Respond with ONLY valid JSON. No explanations, no markdown, no extra text. \
         Start with {{ and end with }}. Generate creative and unique Chinese names based on \
         personal information."
    )
}

/// Build the prompt for position `position` (1-based) of `total`.
///
/// `existing` holds the names accepted so far, in acceptance order.
pub fn build_prompt<R: Rng>(
    request: &GenerationRequest,
    position: usize,
    total: usize,
    existing: &[&str],
    rng: &mut R,
) -> BuiltPrompt {
    let surname = SURNAMES[rng.random_range(0..SURNAMES.len())];
    let seed: u32 = rng.random();
    let nonce: String = (0..NONCE_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect();

    let plan = request.plan;
    let mut lines: Vec<String> = vec![
        "Generate a Chinese name as JSON only. No text before or after the JSON.".into(),
        String::new(),
        "Input Requirements:".into(),
        format!("- English Name: {}", request.english_name),
    ];
    if let Some(year) = request.birth_year.as_deref().map(str::trim).filter(|y| !y.is_empty()) {
        lines.push(format!("- Birth Year: {year}"));
    }
    if let Some(traits) = request.effective_traits() {
        lines.push(format!("- Personality Traits: {traits}"));
    }
    if let Some(prefs) = request.effective_preferences() {
        lines.push(format!("- Name Preferences: {prefs}"));
    }
    lines.extend([
        format!("- Gender: {}", request.gender),
        format!("- Generation Type: {}", plan.label()),
        format!("- Surname: Use \"{surname}\" as the surname"),
        format!("- Seed: {seed}"),
        format!("- UniqueID: {nonce}"),
        format!("- Position: {position} of {total}"),
    ]);

    if !existing.is_empty() {
        lines.extend([
            String::new(),
            "EXISTING NAMES TO AVOID:".into(),
            existing.join(", "),
            "- DO NOT generate any of these names".into(),
            "- Ensure complete uniqueness from existing names".into(),
        ]);
    }

    lines.extend(
        [
            "",
            "UNIQUENESS REQUIREMENTS (CRITICAL):",
            "- This name must be different from every name listed above",
            "- No duplicate names are allowed in this generation batch",
            "- Each name must use a distinct character combination",
            "",
        ]
        .map(String::from),
    );

    let tier_block: [&str; 5] = if plan.is_premium() && request.authenticated {
        [
            "PREMIUM REQUIREMENTS:",
            "- Deep analysis of personality traits and preferences",
            "- Highly personalized character selection",
            "- Advanced cultural matching",
            "- Sophisticated meaning alignment",
        ]
    } else {
        [
            "STANDARD REQUIREMENTS:",
            "- Basic personality matching",
            "- Good cultural appropriateness",
            "- Meaningful character selection",
            "- Balanced, easy to pronounce sounds",
        ]
    };
    lines.extend(tier_block.map(String::from));

    lines.extend([
        String::new(),
        "CREATIVITY REQUIREMENTS:".into(),
        "- Use uncommon but beautiful Chinese characters".into(),
        format!("- Avoid typical combinations like {} etc.", OVERUSED_NAMES.join(", ")),
        "- Draw on characters from different radical families and categories".into(),
        "  (nature, virtues, colors, elements)".into(),
        "- Create unique phonetic combinations".into(),
        String::new(),
        "Output only this JSON structure:".into(),
        json_template(plan),
        String::new(),
        "Requirements:".into(),
        format!("- {} appropriate", request.gender),
        "- Creative, original and distinct".into(),
        "- JSON only, no other text".into(),
    ]);

    let user = lines.join("\n");

    BuiltPrompt {
        system: system_instruction(plan),
        user,
        surname,
        seed,
        nonce,
    }
}

/// The shape the provider must answer with.
fn json_template(plan: PlanType) -> String {
    format!(
        r#"{{
  "chinese": "姓名",
  "pinyin": "Xìngmíng",
  "characters": [
    {{
      "character": "姓",
      "pinyin": "Xìng",
      "meaning": "Surname meaning",
      "explanation": "Brief explanation"
    }},
    {{
      "character": "名",
      "pinyin": "Míng",
      "meaning": "Given name meaning",
      "explanation": "Brief explanation"
    }}
  ],
  "meaning": "Overall name meaning",
  "culturalNotes": "Cultural significance",
  "personalityMatch": "Why this name suits the person's traits and preferences",
  "style": "{}"
}}"#,
        plan.label()
    )
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::plan::Gender;

    fn request(plan: PlanType, authenticated: bool) -> GenerationRequest {
        GenerationRequest {
            english_name: "Oliver".into(),
            gender: Gender::Male,
            birth_year: Some("1990".into()),
            personality_traits: Some("adventurous".into()),
            name_preferences: Some("nature".into()),
            plan,
            authenticated,
        }
    }

    #[test]
    fn same_seed_reproduces_prompt() {
        let req = request(PlanType::Standard, true);
        let a = build_prompt(&req, 1, 6, &[], &mut StdRng::seed_from_u64(7));
        let b = build_prompt(&req, 1, 6, &[], &mut StdRng::seed_from_u64(7));
        assert_eq!(a.surname, b.surname);
        assert_eq!(a.user, b.user);
        assert_eq!(a.nonce.len(), NONCE_LEN);
    }

    #[test]
    fn pins_surname_and_position() {
        let req = request(PlanType::Standard, true);
        let prompt = build_prompt(&req, 2, 6, &[], &mut StdRng::seed_from_u64(1));
        assert!(SURNAMES.contains(&prompt.surname));
        assert!(prompt
            .user
            .contains(&format!("Use \"{}\" as the surname", prompt.surname)));
        assert!(prompt.user.contains("Position: 2 of 6"));
        assert!(prompt.user.contains(&prompt.nonce));
    }

    #[test]
    fn lists_existing_names() {
        let req = request(PlanType::Standard, true);
        let prompt = build_prompt(
            &req,
            3,
            6,
            &["王墨渊", "李清越"],
            &mut StdRng::seed_from_u64(1),
        );
        assert!(prompt.user.contains("EXISTING NAMES TO AVOID:\n王墨渊, 李清越"));
    }

    #[test]
    fn omits_exclusion_block_when_empty() {
        let req = request(PlanType::Standard, true);
        let prompt = build_prompt(&req, 1, 6, &[], &mut StdRng::seed_from_u64(1));
        assert!(!prompt.user.contains("EXISTING NAMES TO AVOID"));
    }

    #[test]
    fn forbids_overused_names() {
        let req = request(PlanType::Standard, false);
        let prompt = build_prompt(&req, 1, 3, &[], &mut StdRng::seed_from_u64(1));
        for name in OVERUSED_NAMES {
            assert!(prompt.user.contains(name));
        }
    }

    #[test]
    fn anonymous_prompt_drops_personalization() {
        let req = request(PlanType::Premium, false);
        let prompt = build_prompt(&req, 1, 3, &[], &mut StdRng::seed_from_u64(1));
        assert!(!prompt.user.contains("adventurous"));
        assert!(!prompt.user.contains("Name Preferences"));
        assert!(prompt.user.contains("Birth Year: 1990"));
        // Premium elaboration is reserved for signed-in callers.
        assert!(prompt.user.contains("STANDARD REQUIREMENTS"));
    }

    #[test]
    fn premium_prompt_for_authenticated() {
        let req = request(PlanType::Premium, true);
        let prompt = build_prompt(&req, 1, 6, &[], &mut StdRng::seed_from_u64(1));
        assert!(prompt.user.contains("PREMIUM REQUIREMENTS"));
        assert!(prompt.user.contains("Personality Traits: adventurous"));
        assert!(prompt.system.contains("premium personalized"));

        let completion = prompt.into_request(PlanType::Premium);
        assert_eq!(completion.sampling, PlanType::Premium.sampling());
    }
}
