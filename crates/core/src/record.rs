//! The generated name record returned to callers and persisted per batch.

use serde::{Deserialize, Serialize};

use crate::plan::PlanType;

/// Presentation tier of a record. Always derived from the requested
/// [`PlanType`], never from provider output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameStyle {
    Standard,
    Premium,
}

impl From<PlanType> for NameStyle {
    fn from(plan: PlanType) -> Self {
        match plan {
            PlanType::Standard => NameStyle::Standard,
            PlanType::Premium => NameStyle::Premium,
        }
    }
}

impl NameStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            NameStyle::Standard => "Standard",
            NameStyle::Premium => "Premium",
        }
    }
}

/// One character of a name with its reading and gloss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub character: String,
    pub pinyin: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub explanation: String,
}

/// A complete generated name. The first entry of `characters` is the
/// surname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameRecord {
    pub chinese: String,
    pub pinyin: String,
    pub characters: Vec<CharacterEntry>,
    pub meaning: String,
    pub cultural_notes: String,
    pub personality_match: String,
    pub style: NameStyle,
}

impl NameRecord {
    /// Surname character, if the record has any characters at all.
    pub fn surname(&self) -> Option<&str> {
        self.characters.first().map(|c| c.character.as_str())
    }
}
