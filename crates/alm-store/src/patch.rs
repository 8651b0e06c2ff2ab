//! Patch applier: merge partial records into matching records.
//!
//! Merge rules for each field of the partial record:
//! - metadata objects (see [`MergeOptions::metadata_keys`]) merge key-by-key
//!   when both sides are objects, keeping untouched keys
//! - everything else, lists included, replaces the existing value wholesale
//!
//! Planning is pure: [`plan`] reads a [`Snapshot`] and returns the updated
//! collections. [`commit`] writes them, one atomic rewrite per touched file.

use std::collections::BTreeMap;

use alm_core::fields;
use alm_core::issue::Location;
use alm_core::patch::PatchSet;
use alm_core::responses::{AppliedPatch, NotApplied, PatchResponse};
use serde_json::{Map, Value};

use crate::loader::LoadedCollection;
use crate::snapshot::Snapshot;
use crate::writer::write_all;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub metadata_keys: Vec<String>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            metadata_keys: vec!["meta".to_string(), "metadata".to_string()],
        }
    }
}

impl MergeOptions {
    fn is_metadata(&self, key: &str) -> bool {
        self.metadata_keys.iter().any(|k| k == key)
    }
}

/// Shallow-merge `partial` into `target`.
pub fn merge_fields(
    target: &mut Map<String, Value>,
    partial: &Map<String, Value>,
    options: &MergeOptions,
) {
    for (key, value) in partial {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) if options.is_metadata(key) => {
                for (inner_key, inner_value) in incoming {
                    existing.insert(inner_key.clone(), inner_value.clone());
                }
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// The result of applying a patch set to a snapshot, before writing.
#[derive(Debug, Clone, Default)]
pub struct PatchPlan {
    /// Only the collections that changed, in snapshot order.
    pub updated: Vec<LoadedCollection>,
    pub applied: Vec<AppliedPatch>,
    pub not_applied: Vec<NotApplied>,
}

/// Apply `patch` to a copy of every matching record in `snapshot`.
///
/// An entry matching no record, or whose partial record carries an `id`
/// different from its key, is reported in `not_applied`. An entry matching
/// several records (duplicate ids) is merged into each of them.
#[must_use]
pub fn plan(snapshot: &Snapshot, patch: &PatchSet, options: &MergeOptions) -> PatchPlan {
    let mut result = PatchPlan::default();
    let mut accepted: BTreeMap<&str, &Map<String, Value>> = BTreeMap::new();

    for (id, partial) in &patch.0 {
        match partial.get(fields::ID) {
            Some(Value::String(new_id)) if new_id != id => {
                result.not_applied.push(NotApplied {
                    id: id.clone(),
                    reason: format!("patch would change id to '{new_id}'"),
                });
            }
            Some(other) if !other.is_string() => {
                result.not_applied.push(NotApplied {
                    id: id.clone(),
                    reason: "patch sets a non-string id".to_string(),
                });
            }
            _ => {
                accepted.insert(id.as_str(), partial);
            }
        }
    }

    let mut locations: BTreeMap<&str, Vec<Location>> = BTreeMap::new();
    for collection in snapshot.collections() {
        let mut updated: Option<LoadedCollection> = None;
        for (index, record) in collection.records.iter().enumerate() {
            let Some((id, partial)) = record
                .id()
                .and_then(|id| accepted.get_key_value(id))
                .map(|(id, partial)| (*id, *partial))
            else {
                continue;
            };

            let target = updated.get_or_insert_with(|| collection.clone());
            if let Some(fields) = target.records[index].fields_mut() {
                merge_fields(fields, partial, options);
            }
            locations
                .entry(id)
                .or_default()
                .push(collection.location(index));
        }
        if let Some(updated) = updated {
            result.updated.push(updated);
        }
    }

    for (id, partial) in accepted {
        match locations.remove(id) {
            Some(found) => result.applied.push(AppliedPatch {
                id: id.to_string(),
                fields: partial.keys().cloned().collect(),
                locations: found,
            }),
            None => {
                tracing::warn!(%id, "patch entry matches no record");
                result.not_applied.push(NotApplied {
                    id: id.to_string(),
                    reason: "no record with this id".to_string(),
                });
            }
        }
    }
    result.not_applied.sort_by(|a, b| a.id.cmp(&b.id));

    result
}

/// Write every updated collection (unless `dry_run`) and describe the outcome.
#[must_use]
pub fn commit(plan: PatchPlan, dry_run: bool) -> PatchResponse {
    let summary = if dry_run {
        crate::writer::WriteSummary::default()
    } else {
        write_all(&plan.updated)
    };

    PatchResponse {
        dry_run,
        applied: plan.applied,
        not_applied: plan.not_applied,
        written: summary.written,
        write_failures: summary.failures,
    }
}
