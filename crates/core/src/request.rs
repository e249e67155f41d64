//! Validated generation request.

use crate::plan::{Gender, PlanType};

/// Number of names produced for an authenticated caller.
pub const AUTHENTICATED_NAME_COUNT: usize = 6;

/// Number of names produced for an anonymous caller.
pub const ANONYMOUS_NAME_COUNT: usize = 3;

/// Profile the names are generated for. Constructed by the HTTP layer after
/// validation, so `english_name` is known to be non-empty.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub english_name: String,
    pub gender: Gender,
    pub birth_year: Option<String>,
    pub personality_traits: Option<String>,
    pub name_preferences: Option<String>,
    pub plan: PlanType,
    /// Whether the caller is signed in. Controls batch size and whether
    /// traits/preferences are honored.
    pub authenticated: bool,
}

impl GenerationRequest {
    /// How many names this request produces.
    pub fn name_count(&self) -> usize {
        if self.authenticated {
            AUTHENTICATED_NAME_COUNT
        } else {
            ANONYMOUS_NAME_COUNT
        }
    }

    /// Personality traits, only when the caller may use personalization.
    pub fn effective_traits(&self) -> Option<&str> {
        self.personalized(self.personality_traits.as_deref())
    }

    /// Name preferences, only when the caller may use personalization.
    pub fn effective_preferences(&self) -> Option<&str> {
        self.personalized(self.name_preferences.as_deref())
    }

    fn personalized<'a>(&self, value: Option<&'a str>) -> Option<&'a str> {
        if !self.authenticated {
            return None;
        }
        value.map(str::trim).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(authenticated: bool) -> GenerationRequest {
        GenerationRequest {
            english_name: "Alice".into(),
            gender: Gender::Female,
            birth_year: None,
            personality_traits: Some("curious".into()),
            name_preferences: Some("  ".into()),
            plan: PlanType::Standard,
            authenticated,
        }
    }

    #[test]
    fn anonymous_gets_three_and_no_personalization() {
        let req = request(false);
        assert_eq!(req.name_count(), 3);
        assert_eq!(req.effective_traits(), None);
    }

    #[test]
    fn authenticated_gets_six_and_personalization() {
        let req = request(true);
        assert_eq!(req.name_count(), 6);
        assert_eq!(req.effective_traits(), Some("curious"));
        // Blank values are treated as absent.
        assert_eq!(req.effective_preferences(), None);
    }
}
