//! Plan tiers and requester gender.
//!
//! The plan tier decides credit cost, prompt elaboration, sampling
//! parameters and the `style` label stamped on every generated record.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::provider::SamplingParams;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Credits charged for a Standard generation.
pub const STANDARD_CREDIT_COST: i32 = 1;

/// Credits charged for a Premium generation.
pub const PREMIUM_CREDIT_COST: i32 = 4;

/// Upper bound on completion length for both tiers.
pub const MAX_OUTPUT_TOKENS: u32 = 1200;

// ---------------------------------------------------------------------------
// PlanType
// ---------------------------------------------------------------------------

/// Requested plan tier.
///
/// On the wire the tier is its credit cost as a string (`"1"` or `"4"`),
/// which is what clients send and what the response echoes back. Numeric
/// values and the tier names are accepted on input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanType {
    Standard,
    Premium,
}

impl PlanType {
    /// Number of credits deducted from an authenticated caller.
    pub fn credit_cost(self) -> i32 {
        match self {
            PlanType::Standard => STANDARD_CREDIT_COST,
            PlanType::Premium => PREMIUM_CREDIT_COST,
        }
    }

    /// Wire code, e.g. `"4"` for Premium.
    pub fn code(self) -> &'static str {
        match self {
            PlanType::Standard => "1",
            PlanType::Premium => "4",
        }
    }

    /// Human-readable tier name, also used as the record `style`.
    pub fn label(self) -> &'static str {
        match self {
            PlanType::Standard => "Standard",
            PlanType::Premium => "Premium",
        }
    }

    pub fn is_premium(self) -> bool {
        self == PlanType::Premium
    }

    /// Sampling parameters for the completion call. Premium samples hotter
    /// to get less conventional characters.
    pub fn sampling(self) -> SamplingParams {
        match self {
            PlanType::Standard => SamplingParams {
                temperature: 0.8,
                max_tokens: MAX_OUTPUT_TOKENS,
                top_p: 0.9,
            },
            PlanType::Premium => SamplingParams {
                temperature: 0.9,
                max_tokens: MAX_OUTPUT_TOKENS,
                top_p: 0.95,
            },
        }
    }

    /// Parse a plan code or name.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim() {
            "1" => Ok(PlanType::Standard),
            "4" => Ok(PlanType::Premium),
            v if v.eq_ignore_ascii_case("standard") => Ok(PlanType::Standard),
            v if v.eq_ignore_ascii_case("premium") => Ok(PlanType::Premium),
            other => Err(CoreError::Validation(format!(
                "Invalid planType '{other}'. Must be one of: \"1\", \"4\""
            ))),
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PlanType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for PlanType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        };
        PlanType::parse(&text).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Parse a gender string. Unknown values are a validation error rather
    /// than silently mapped to `Other`.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(CoreError::Validation(format!(
                "Invalid gender '{other}'. Must be one of: male, female, other"
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
