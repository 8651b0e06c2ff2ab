//! Fuzzy resolution of one dangling identifier against a candidate pool.

use alm_config::ReconcileConfig;
use alm_core::enums::{EntityKind, MatchedField};
use alm_core::responses::Resolution;
use alm_store::Snapshot;

use crate::error::ReconcileError;
use crate::similarity::{SimilarityStrategy, normalize, strategy_for};

/// A record that a dangling reference might have meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub collection: String,
}

impl Candidate {
    /// The fields a reference may be matched on, in priority order.
    fn keys(&self) -> impl Iterator<Item = (MatchedField, &str)> {
        [
            Some((MatchedField::Id, self.id.as_str())),
            self.name.as_deref().map(|n| (MatchedField::Name, n)),
            self.short_name
                .as_deref()
                .map(|s| (MatchedField::ShortName, s)),
        ]
        .into_iter()
        .flatten()
    }
}

/// Every record of `kind` that has an id, in collection then record order.
#[must_use]
pub fn candidates(snapshot: &Snapshot, kind: EntityKind) -> Vec<Candidate> {
    snapshot
        .of_kind(kind)
        .flat_map(|collection| {
            collection.records.iter().filter_map(|record| {
                Some(Candidate {
                    id: record.id()?.to_string(),
                    name: record.name().map(ToString::to_string),
                    short_name: record.short_name().map(ToString::to_string),
                    collection: collection.name().to_string(),
                })
            })
        })
        .collect()
}

/// The best-scoring candidate, whether or not it passes the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMatch {
    /// Index into the candidate slice.
    pub index: usize,
    pub distance: f64,
    pub field: MatchedField,
}

pub struct FuzzyReconciler {
    strategy: Box<dyn SimilarityStrategy>,
    max_distance: f64,
}

impl FuzzyReconciler {
    /// # Errors
    ///
    /// Returns `ReconcileError::InvalidThreshold` when `max_distance` is
    /// outside `[0, 1]`.
    pub fn new(
        strategy: Box<dyn SimilarityStrategy>,
        max_distance: f64,
    ) -> Result<Self, ReconcileError> {
        if !(0.0..=1.0).contains(&max_distance) {
            return Err(ReconcileError::InvalidThreshold {
                field: "max_distance",
                value: max_distance,
            });
        }
        Ok(Self {
            strategy,
            max_distance,
        })
    }

    /// Reconciler for dangling references.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::InvalidThreshold` for an out-of-range threshold.
    pub fn from_config(config: &ReconcileConfig) -> Result<Self, ReconcileError> {
        Self::new(strategy_for(config.strategy), config.max_distance)
    }

    /// Reconciler tuned for near-duplicate detection.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::InvalidThreshold` for an out-of-range threshold.
    pub fn for_duplicates(config: &ReconcileConfig) -> Result<Self, ReconcileError> {
        Self::new(strategy_for(config.strategy), config.duplicate_max_distance).map_err(|_| {
            ReconcileError::InvalidThreshold {
                field: "duplicate_max_distance",
                value: config.duplicate_max_distance,
            }
        })
    }

    #[must_use]
    pub fn strategy(&self) -> &dyn SimilarityStrategy {
        self.strategy.as_ref()
    }

    #[must_use]
    pub const fn max_distance(&self) -> f64 {
        self.max_distance
    }

    #[must_use]
    pub fn accepts(&self, distance: f64) -> bool {
        distance <= self.max_distance
    }

    /// Score `reference` against every candidate and keep the closest.
    ///
    /// Each candidate scores the minimum distance over its id, name and
    /// short name. Ties keep the earlier candidate. A reference that
    /// normalizes to nothing matches nothing.
    #[must_use]
    pub fn best_match(&self, reference: &str, candidates: &[Candidate]) -> Option<ScoredMatch> {
        let needle = normalize(reference);
        if needle.is_empty() {
            return None;
        }

        let mut best: Option<ScoredMatch> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            for (field, key) in candidate.keys() {
                let key = normalize(key);
                if key.is_empty() {
                    continue;
                }
                let distance = self.strategy.distance(&needle, &key);
                if best.is_none_or(|b| distance < b.distance) {
                    best = Some(ScoredMatch {
                        index,
                        distance,
                        field,
                    });
                }
            }
        }
        best
    }

    /// Resolve `reference`, or keep it verbatim as unresolved.
    #[must_use]
    pub fn resolve(&self, reference: &str, candidates: &[Candidate]) -> Resolution {
        match self.best_match(reference, candidates) {
            Some(found) if self.accepts(found.distance) => Resolution::Resolved {
                target: candidates[found.index].id.clone(),
                distance: found.distance,
                matched_field: found.field,
            },
            _ => Resolution::Unresolved {
                reference: reference.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::similarity::Levenshtein;

    fn candidate(id: &str, name: Option<&str>, short_name: Option<&str>) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: name.map(ToString::to_string),
            short_name: short_name.map(ToString::to_string),
            collection: "gujarat".to_string(),
        }
    }

    fn reconciler(max_distance: f64) -> FuzzyReconciler {
        FuzzyReconciler::new(Box::new(Levenshtein), max_distance).unwrap()
    }

    #[test]
    fn resolves_on_closest_key() {
        let pool = vec![
            candidate("ldce", Some("L.D. College of Engineering"), None),
            candidate("gec-gn", Some("Government Engineering College"), Some("GEC Gandhinagar")),
        ];

        let resolution = reconciler(0.35).resolve("GEC-Gandhinagar", &pool);

        assert_eq!(
            resolution,
            Resolution::Resolved {
                target: "gec-gn".to_string(),
                distance: 0.0,
                matched_field: MatchedField::ShortName,
            }
        );
    }

    #[test]
    fn ties_go_to_the_first_candidate() {
        let pool = vec![
            candidate("nit-a", None, None),
            candidate("nit-b", None, None),
        ];

        let resolution = reconciler(0.5).resolve("nit-c", &pool);

        assert_eq!(resolution.effective_target(), "nit-a");
    }

    #[test]
    fn too_far_stays_verbatim() {
        let pool = vec![candidate("ldce", Some("LDCE"), None)];

        let resolution = reconciler(0.35).resolve("Some Unknown Exam!", &pool);

        assert_eq!(
            resolution,
            Resolution::Unresolved {
                reference: "Some Unknown Exam!".to_string()
            }
        );
    }

    #[test]
    fn empty_pool_and_empty_reference_are_unresolved() {
        assert!(!reconciler(1.0).resolve("ldce", &[]).is_resolved());
        let pool = vec![candidate("ldce", None, None)];
        assert!(!reconciler(1.0).resolve("--", &pool).is_resolved());
    }

    #[test]
    fn rejects_threshold_outside_unit_range() {
        assert!(FuzzyReconciler::new(Box::new(Levenshtein), -0.1).is_err());
        assert!(FuzzyReconciler::new(Box::new(Levenshtein), 1.1).is_err());
    }
}
