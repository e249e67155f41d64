//! Deterministic fallback synthesis.
//!
//! Used whenever provider output for an iteration is unusable. Builds a
//! complete [`NameRecord`] purely from the lexicon tables, so it cannot fail.

use crate::lexicon::{self, DEFAULT_SURNAME_PINYIN};
use crate::plan::{Gender, PlanType};
use crate::record::{CharacterEntry, NameRecord, NameStyle};

const SURNAME_MEANING: &str = "Family surname";
const SURNAME_EXPLANATION: &str =
    "A traditional Chinese family name with historical significance.";
const FALLBACK_PERSONALITY_MATCH: &str = "This fallback name maintains cultural appropriateness \
     and positive connotations suitable for the specified preferences";

/// Build a fallback name for iteration `index`.
///
/// The given name is `given_names(gender)[index % len]`. The same inputs
/// always produce the same record.
pub fn synthesize(index: usize, surname: &str, gender: Gender, plan: PlanType) -> NameRecord {
    let templates = lexicon::given_names(gender);
    let given = templates[index % templates.len()];

    let surname_pinyin = lexicon::surname_pinyin(surname).unwrap_or(DEFAULT_SURNAME_PINYIN);

    let mut characters = Vec::with_capacity(3);
    characters.push(CharacterEntry {
        character: surname.to_string(),
        pinyin: surname_pinyin.to_string(),
        meaning: SURNAME_MEANING.to_string(),
        explanation: SURNAME_EXPLANATION.to_string(),
    });

    let mut given_pinyin = String::new();
    for (pos, ch) in given.chars().enumerate() {
        let pinyin = lexicon::char_pinyin(ch);
        let meaning = lexicon::char_meaning(ch);
        // Given syllables are joined and only the first keeps its capital.
        if pos == 0 {
            given_pinyin.push_str(pinyin);
        } else {
            given_pinyin.push_str(&pinyin.to_lowercase());
        }

        let verb = if pos == 0 { "Represents" } else { "Symbolizes" };
        characters.push(CharacterEntry {
            character: ch.to_string(),
            pinyin: pinyin.to_string(),
            meaning: meaning.to_string(),
            explanation: format!("{verb} {} qualities", meaning.to_lowercase()),
        });
    }

    NameRecord {
        chinese: format!("{surname}{given}"),
        pinyin: format!("{surname_pinyin} {given_pinyin}"),
        characters,
        meaning: format!(
            "A {} Chinese name with positive meanings and cultural significance",
            plan.label().to_lowercase()
        ),
        cultural_notes: format!(
            "Traditional Chinese name reflecting {gender} characteristics with auspicious meanings"
        ),
        personality_match: FALLBACK_PERSONALITY_MATCH.to_string(),
        style: NameStyle::from(plan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_full_record() {
        let record = synthesize(0, "王", Gender::Male, PlanType::Standard);
        assert_eq!(record.chinese, "王志明");
        assert_eq!(record.pinyin, "Wáng Zhìmíng");
        assert_eq!(record.characters.len(), 3);
        assert_eq!(record.surname(), Some("王"));
        assert_eq!(record.characters[1].meaning, "Ambition");
        assert_eq!(record.characters[1].explanation, "Represents ambition qualities");
        assert_eq!(record.characters[2].explanation, "Symbolizes bright qualities");
        assert_eq!(record.style, NameStyle::Standard);
        assert!(record.meaning.contains("standard"));
    }

    #[test]
    fn index_wraps_around_templates() {
        let a = synthesize(1, "李", Gender::Female, PlanType::Premium);
        let b = synthesize(7, "李", Gender::Female, PlanType::Premium);
        assert_eq!(a, b);
        assert_eq!(a.chinese, "李美丽");
        assert_eq!(a.style, NameStyle::Premium);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        for i in 0..12 {
            assert_eq!(
                synthesize(i, "萧", Gender::Other, PlanType::Premium),
                synthesize(i, "萧", Gender::Other, PlanType::Premium)
            );
        }
    }

    #[test]
    fn unknown_surname_uses_default_reading() {
        let record = synthesize(0, "欧", Gender::Other, PlanType::Standard);
        assert_eq!(record.chinese, "欧明智");
        assert!(record.pinyin.starts_with("Wáng "));
        assert_eq!(record.characters[0].pinyin, DEFAULT_SURNAME_PINYIN);
    }

    #[test]
    fn distinct_within_one_gender_cycle() {
        let names: std::collections::HashSet<_> = (0..6)
            .map(|i| synthesize(i, "张", Gender::Male, PlanType::Standard).chinese)
            .collect();
        assert_eq!(names.len(), 6);
    }
}
