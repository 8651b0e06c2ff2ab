//! Entity kinds, issue kinds, and strategy selectors for Almanac.
//!
//! Entity and strategy enums use `snake_case` serialization. Issue kinds use
//! `SCREAMING_SNAKE_CASE` because that is how operators grep audit reports.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The kind of record a collection holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    College,
    Exam,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::College => "college",
            Self::Exam => "exam",
        }
    }

    /// Name of the array field used when a wrapped container has to be
    /// created from scratch for this kind.
    #[must_use]
    pub const fn container_field(self) -> &'static str {
        match self {
            Self::College => "colleges",
            Self::Exam => "exams",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "college" | "colleges" => Ok(Self::College),
            "exam" | "exams" => Ok(Self::Exam),
            other => Err(CoreError::Validation(format!(
                "unknown entity kind '{other}' (expected 'college' or 'exam')"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// IssueKind
// ---------------------------------------------------------------------------

/// Category of a data integrity issue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// Reference target absent from the target kind's identifier set.
    DanglingReference,
    /// Same identifier more than once within one logical collection.
    DuplicateId,
    /// Record lacks `id` or `name`.
    MissingRequiredField,
    /// Accepted exam without cutoff history, or cutoff history for an exam
    /// the record does not accept.
    AcceptedCutoffMismatch,
    /// Cutoff value is a "not yet collected" sentinel.
    PlaceholderData,
    /// Exam lists a college that does not list the exam back (or reverse).
    AcceptanceAsymmetry,
}

impl IssueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DanglingReference => "DANGLING_REFERENCE",
            Self::DuplicateId => "DUPLICATE_ID",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::AcceptedCutoffMismatch => "ACCEPTED_CUTOFF_MISMATCH",
            Self::PlaceholderData => "PLACEHOLDER_DATA",
            Self::AcceptanceAsymmetry => "ACCEPTANCE_ASYMMETRY",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StrategyKind
// ---------------------------------------------------------------------------

/// Which string similarity function the reconciler uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Normalized Levenshtein edit distance.
    #[default]
    Levenshtein,
    /// `1 - jaro_winkler`, favours shared prefixes.
    JaroWinkler,
    /// `1 - jaccard` over normalized word tokens.
    TokenOverlap,
}

impl StrategyKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Levenshtein => "levenshtein",
            Self::JaroWinkler => "jaro_winkler",
            Self::TokenOverlap => "token_overlap",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MatchedField
// ---------------------------------------------------------------------------

/// Which candidate field produced the best similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchedField {
    Id,
    Name,
    ShortName,
}

impl MatchedField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::ShortName => "short_name",
        }
    }
}

impl fmt::Display for MatchedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_parses_singular_and_plural() {
        assert_eq!("college".parse::<EntityKind>().unwrap(), EntityKind::College);
        assert_eq!(" Exams ".parse::<EntityKind>().unwrap(), EntityKind::Exam);
        assert!("university".parse::<EntityKind>().is_err());
    }

    #[test]
    fn issue_kind_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&IssueKind::AcceptedCutoffMismatch).unwrap();
        assert_eq!(json, "\"ACCEPTED_CUTOFF_MISMATCH\"");
        assert_eq!(
            IssueKind::DanglingReference.to_string(),
            "DANGLING_REFERENCE"
        );
    }

    #[test]
    fn strategy_default_is_levenshtein() {
        assert_eq!(StrategyKind::default(), StrategyKind::Levenshtein);
        let parsed: StrategyKind = serde_json::from_str("\"token_overlap\"").unwrap();
        assert_eq!(parsed, StrategyKind::TokenOverlap);
    }
}
