//! Swappable string similarity strategies.
//!
//! Every strategy maps a pair of strings to a normalized distance in
//! `[0, 1]`: `0.0` is identical, `1.0` shares nothing. Inputs are normalized
//! with [`normalize`] first, so case and punctuation never matter.

use std::collections::BTreeSet;

use alm_core::enums::StrategyKind;

/// Lowercase, turn every non-alphanumeric character into a space, and
/// collapse runs of whitespace.
///
/// `"NIT-Surat"`, `"nit surat"` and `" nit_surat. "` all become `"nit surat"`.
#[must_use]
pub fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A named distance function over normalized strings.
pub trait SimilarityStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Distance between two already-normalized strings.
    fn distance(&self, a: &str, b: &str) -> f64;

    /// Distance between two raw strings.
    fn compare(&self, a: &str, b: &str) -> f64 {
        self.distance(&normalize(a), &normalize(b))
    }
}

/// Edit distance divided by the longer length.
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl SimilarityStrategy for Levenshtein {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Levenshtein
    }

    fn distance(&self, a: &str, b: &str) -> f64 {
        1.0 - strsim::normalized_levenshtein(a, b)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl SimilarityStrategy for JaroWinkler {
    fn kind(&self) -> StrategyKind {
        StrategyKind::JaroWinkler
    }

    fn distance(&self, a: &str, b: &str) -> f64 {
        1.0 - strsim::jaro_winkler(a, b)
    }
}

/// Jaccard distance over whitespace-separated tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOverlap;

impl SimilarityStrategy for TokenOverlap {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TokenOverlap
    }

    #[allow(clippy::cast_precision_loss)]
    fn distance(&self, a: &str, b: &str) -> f64 {
        let left: BTreeSet<&str> = a.split_whitespace().collect();
        let right: BTreeSet<&str> = b.split_whitespace().collect();
        let union = left.union(&right).count();
        if union == 0 {
            return 0.0;
        }
        let shared = left.intersection(&right).count();
        1.0 - shared as f64 / union as f64
    }
}

#[must_use]
pub fn strategy_for(kind: StrategyKind) -> Box<dyn SimilarityStrategy> {
    match kind {
        StrategyKind::Levenshtein => Box::new(Levenshtein),
        StrategyKind::JaroWinkler => Box::new(JaroWinkler),
        StrategyKind::TokenOverlap => Box::new(TokenOverlap),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("NIT-Surat", "nit surat")]
    #[case("  svnit_surat. ", "svnit surat")]
    #[case("I.I.T. (Bombay)", "i i t bombay")]
    #[case("---", "")]
    fn normalize_folds_case_and_punctuation(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[rstest]
    #[case(StrategyKind::Levenshtein)]
    #[case(StrategyKind::JaroWinkler)]
    #[case(StrategyKind::TokenOverlap)]
    fn identical_after_normalization_is_zero(#[case] kind: StrategyKind) {
        let strategy = strategy_for(kind);
        assert_eq!(strategy.kind(), kind);
        assert!(strategy.compare("NIT Surat", "nit-surat").abs() < f64::EPSILON);
        assert!(strategy.compare("gujcet", "nit surat") > 0.3);
    }

    #[test]
    fn levenshtein_scales_by_longer_input() {
        let distance = Levenshtein.distance("nit surat", "svnit surat");
        assert!((distance - 2.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn token_overlap_ignores_word_order() {
        assert!(TokenOverlap.compare("Surat NIT", "nit surat").abs() < f64::EPSILON);
        assert!((TokenOverlap.distance("nit surat", "svnit surat") - 2.0 / 3.0).abs() < 1e-9);
    }
}
