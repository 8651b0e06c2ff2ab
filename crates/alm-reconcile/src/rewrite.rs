//! Resolved proposals expressed as a patch set.
//!
//! Only resolved proposals produce patch entries. An unresolved reference is
//! never written, so it stays in the data exactly as it was.
//!
//! A patch entry replaces a whole top-level field, so each entry starts from
//! the record's current value of that field and rewrites just the resolved
//! positions. Several proposals against the same field of one record fold
//! into a single entry.
//!
//! `acceptedExams`, `courses[].exams` and `collegesAccepting` are sets: when
//! the resolved id is already listed, the dangling entry is dropped instead
//! of rewritten.

use std::cmp::Reverse;
use std::collections::HashMap;

use alm_core::patch::PatchSet;
use alm_core::reference::FieldPath;
use alm_core::responses::{ReconcileProposal, Resolution};
use alm_store::Snapshot;
use serde_json::Value;

/// A resolved proposal that cannot be expressed as a patch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub collection: String,
    pub record_index: usize,
    pub reason: String,
}

/// A dangling set entry removed because its resolution was already listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropped {
    pub id: String,
    pub path: FieldPath,
    pub reference: String,
}

#[derive(Debug, Clone, Default)]
pub struct Rewrite {
    pub patch: PatchSet,
    pub skipped: Vec<Skipped>,
    pub dropped: Vec<Dropped>,
}

/// Build the patch set applying every resolved proposal.
///
/// Patches address records by id, so a proposal whose record has no id, or
/// whose id is shared with another record, is skipped.
#[must_use]
pub fn to_patch(snapshot: &Snapshot, proposals: &[ReconcileProposal]) -> Rewrite {
    let mut id_counts: HashMap<&str, usize> = HashMap::new();
    for collection in snapshot.collections() {
        for id in collection.records.iter().filter_map(|r| r.id()) {
            *id_counts.entry(id).or_default() += 1;
        }
    }

    let mut rewrite = Rewrite::default();
    for proposal in proposals {
        let Resolution::Resolved { target, .. } = &proposal.resolution else {
            continue;
        };

        let mut skip = |reason: String| {
            tracing::warn!(
                collection = %proposal.collection,
                record_index = proposal.record_index,
                %reason,
                "resolved proposal not patchable"
            );
            rewrite.skipped.push(Skipped {
                collection: proposal.collection.clone(),
                record_index: proposal.record_index,
                reason,
            });
        };

        let Some(record) = snapshot
            .find(&proposal.collection)
            .and_then(|c| c.records.get(proposal.record_index))
        else {
            skip("record not found".to_string());
            continue;
        };
        let Some(id) = record.id() else {
            skip("record has no id".to_string());
            continue;
        };
        if id_counts.get(id).copied().unwrap_or(0) > 1 {
            skip(format!("id '{id}' is shared by several records"));
            continue;
        }

        let field = proposal.path.top_level_field();
        let mut value = rewrite
            .patch
            .get(id)
            .and_then(|entry| entry.get(field))
            .or_else(|| record.get(field))
            .cloned()
            .unwrap_or(Value::Null);
        if proposal.path.read(record) != Some(proposal.reference.as_str()) {
            skip(format!("{} no longer holds '{}'", proposal.path, proposal.reference));
            continue;
        }
        if proposal.path.set_contains_elsewhere(&value, target) {
            rewrite.dropped.push(Dropped {
                id: id.to_string(),
                path: proposal.path,
                reference: proposal.reference.clone(),
            });
        } else if !proposal.path.write(&mut value, target) {
            skip(format!("{} is no longer a string", proposal.path));
            continue;
        }
        rewrite.patch.set(id, field, value);
    }

    remove_dropped(&mut rewrite);
    rewrite
}

/// Remove dropped entries, highest index first so earlier positions hold.
fn remove_dropped(rewrite: &mut Rewrite) {
    rewrite
        .dropped
        .sort_by_key(|d| Reverse(d.path.set_index().unwrap_or_default()));
    rewrite
        .dropped
        .dedup_by(|a, b| a.id == b.id && a.path == b.path);

    for dropped in &rewrite.dropped {
        let field = dropped.path.top_level_field();
        let Some(list) = rewrite
            .patch
            .0
            .get_mut(&dropped.id)
            .and_then(|entry| entry.get_mut(field))
            .and_then(|top| dropped.path.set_in_mut(top))
        else {
            continue;
        };
        if let Some(index) = dropped.path.set_index().filter(|i| *i < list.len()) {
            list.remove(index);
            tracing::info!(
                id = %dropped.id,
                path = %dropped.path,
                reference = %dropped.reference,
                "dropped dangling entry whose match is already listed"
            );
        }
    }
}
