//! Tolerant decoding of provider output into a [`NameRecord`].
//!
//! Providers are told to answer with bare JSON but routinely wrap it in
//! prose or code fences. The parser cuts out the outermost `{ ... }` span,
//! decodes it into a loosely-typed draft, then checks the draft against the
//! record schema.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::plan::PlanType;
use crate::record::{CharacterEntry, NameRecord, NameStyle};

/// Smallest `{ ... }` span, used only when the outer-brace cut fails.
static OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*?\}").expect("valid regex"));

/// Allowed number of entries in `characters` (surname plus one or two).
const MIN_CHARACTERS: usize = 2;
const MAX_CHARACTERS: usize = 3;

/// Why a provider response could not be turned into a record.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No JSON object could be located, or it failed to decode.
    #[error("Unparseable provider response: {0}")]
    Parse(String),

    /// The JSON decoded but does not satisfy the record schema.
    #[error("Provider response failed schema check: {0}")]
    Schema(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftName {
    chinese: Option<String>,
    pinyin: Option<String>,
    characters: Option<Vec<DraftCharacter>>,
    meaning: Option<String>,
    cultural_notes: Option<String>,
    personality_match: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DraftCharacter {
    #[serde(default)]
    character: String,
    #[serde(default)]
    pinyin: String,
    #[serde(default)]
    meaning: String,
    #[serde(default)]
    explanation: String,
}

/// Locate the JSON object candidate inside `raw`.
///
/// Prefers the span from the first `{` to the last `}`; falls back to the
/// first minimal brace-delimited substring.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => Some(&trimmed[start..=end]),
        _ => OBJECT_RE.find(trimmed).map(|m| m.as_str()),
    }
}

/// Decode a provider response for a request of tier `plan`.
///
/// The record `style` is always set from `plan`, whatever the provider
/// wrote.
pub fn parse_name_response(raw: &str, plan: PlanType) -> Result<NameRecord, ParseError> {
    let candidate = extract_json_object(raw)
        .ok_or_else(|| ParseError::Parse("no JSON object found in response".into()))?;

    let draft: DraftName =
        serde_json::from_str(candidate).map_err(|e| ParseError::Parse(e.to_string()))?;

    let chinese = required_text(draft.chinese, "chinese")?;
    let pinyin = required_text(draft.pinyin, "pinyin")?;
    let characters = draft
        .characters
        .ok_or_else(|| ParseError::Schema("missing field `characters`".into()))?;

    if !(MIN_CHARACTERS..=MAX_CHARACTERS).contains(&characters.len()) {
        return Err(ParseError::Schema(format!(
            "`characters` must have {MIN_CHARACTERS}-{MAX_CHARACTERS} entries, got {}",
            characters.len()
        )));
    }

    Ok(NameRecord {
        chinese,
        pinyin,
        characters: characters
            .into_iter()
            .map(|c| CharacterEntry {
                character: c.character,
                pinyin: c.pinyin,
                meaning: c.meaning,
                explanation: c.explanation,
            })
            .collect(),
        meaning: draft.meaning.unwrap_or_default(),
        cultural_notes: draft.cultural_notes.unwrap_or_default(),
        personality_match: draft.personality_match.unwrap_or_default(),
        style: NameStyle::from(plan),
    })
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ParseError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ParseError::Schema(format!("missing field `{field}`")))
}
