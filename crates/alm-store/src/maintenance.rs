//! Explicit record-removing operations: duplicate removal and collection merge.
//!
//! These are the only operations that physically drop records. Both plan
//! against a snapshot first and rewrite only the files they change.

use std::collections::HashMap;
use std::path::Path;

use alm_core::enums::EntityKind;
use alm_core::issue::Location;
use alm_core::responses::RemovedRecord;

use crate::error::StoreError;
use crate::loader::LoadedCollection;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Default)]
pub struct DedupePlan {
    pub updated: Vec<LoadedCollection>,
    pub removed: Vec<RemovedRecord>,
}

/// Drop every record whose id already appeared earlier in the same logical
/// collection (same kind), scanning collections and records in order.
/// Records without an id are never removed.
#[must_use]
pub fn plan_dedupe(snapshot: &Snapshot) -> DedupePlan {
    let mut plan = DedupePlan::default();
    let mut first_seen: HashMap<(EntityKind, String), Location> = HashMap::new();

    for collection in snapshot.collections() {
        let mut kept = Vec::with_capacity(collection.records.len());
        let mut dropped_any = false;

        for (index, record) in collection.records.iter().enumerate() {
            let Some(id) = record.id() else {
                kept.push(record.clone());
                continue;
            };
            let key = (collection.kind(), id.to_string());
            if let Some(original) = first_seen.get(&key) {
                plan.removed.push(RemovedRecord {
                    id: id.to_string(),
                    location: collection.location(index),
                    kept: original.clone(),
                });
                dropped_any = true;
            } else {
                first_seen.insert(key, collection.location(index));
                kept.push(record.clone());
            }
        }

        if dropped_any {
            let mut updated = collection.clone();
            updated.records = kept;
            plan.updated.push(updated);
        }
    }

    plan
}

#[derive(Debug, Clone)]
pub struct MergePlan {
    pub target: LoadedCollection,
    pub appended: usize,
    pub collisions: Vec<String>,
}

/// Append the records of collection `from` to collection `into`.
///
/// Source records whose id already exists in the target are not copied and
/// are listed as collisions. Source records without an id are copied.
///
/// # Errors
///
/// Returns `StoreError::UnknownCollection` for an unknown name,
/// `StoreError::SelfMerge` when both names are equal, and
/// `StoreError::KindMismatch` when the collections hold different kinds.
pub fn plan_merge(snapshot: &Snapshot, from: &str, into: &str) -> Result<MergePlan, StoreError> {
    if from == into {
        return Err(StoreError::SelfMerge(from.to_string()));
    }
    let source = snapshot.require(from)?;
    let target = snapshot.require(into)?;
    if source.kind() != target.kind() {
        return Err(StoreError::KindMismatch {
            name: from.to_string(),
            expected: target.kind().to_string(),
            actual: source.kind().to_string(),
        });
    }

    let mut merged = target.clone();
    let mut known: std::collections::HashSet<String> = target
        .records
        .iter()
        .filter_map(|r| r.id().map(ToString::to_string))
        .collect();

    let mut appended = 0;
    let mut collisions = Vec::new();
    for record in &source.records {
        match record.id() {
            Some(id) if known.contains(id) => collisions.push(id.to_string()),
            id => {
                if let Some(id) = id {
                    known.insert(id.to_string());
                }
                merged.records.push(record.clone());
                appended += 1;
            }
        }
    }

    Ok(MergePlan {
        target: merged,
        appended,
        collisions,
    })
}

/// Delete a collection file that has been merged elsewhere.
///
/// # Errors
///
/// Returns `StoreError::Io` if the file exists and cannot be removed.
pub fn remove_collection_file(path: &Path) -> Result<(), StoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(StoreError::io(path, error)),
    }
}
