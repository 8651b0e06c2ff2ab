//! Immutable, read-once view of every configured collection.
//!
//! Every audit or repair call loads one `Snapshot` up front and never
//! re-reads a file during that call. Repairs compute new collection values
//! from the snapshot and hand them to the writer; the snapshot itself is
//! never mutated.

use alm_core::collection::CollectionSpec;
use alm_core::enums::EntityKind;
use alm_core::responses::{CollectionSummary, LoadFailure};

use crate::error::StoreError;
use crate::loader::{LoadedCollection, load_collection};

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    collections: Vec<LoadedCollection>,
    failures: Vec<LoadFailure>,
}

impl Snapshot {
    /// Load every collection in `specs`, in order.
    ///
    /// Files that fail to read or parse are left out of the snapshot and
    /// recorded as failures; references into them will read as dangling.
    #[must_use]
    pub fn load(specs: &[CollectionSpec]) -> Self {
        let mut snapshot = Self::default();
        for spec in specs {
            match load_collection(spec) {
                Ok(collection) => snapshot.collections.push(collection),
                Err(error) => {
                    tracing::error!(
                        collection = %spec.name,
                        path = %spec.path.display(),
                        %error,
                        "failed to load collection; excluding it from the audit"
                    );
                    snapshot.failures.push(LoadFailure {
                        collection: spec.name.clone(),
                        path: spec.path.clone(),
                        message: error.to_string(),
                    });
                }
            }
        }
        snapshot
    }

    /// Build a snapshot from already-loaded collections.
    #[must_use]
    pub const fn from_collections(collections: Vec<LoadedCollection>) -> Self {
        Self {
            collections,
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub fn collections(&self) -> &[LoadedCollection] {
        &self.collections
    }

    #[must_use]
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &LoadedCollection> {
        self.collections.iter().filter(move |c| c.kind() == kind)
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&LoadedCollection> {
        self.collections.iter().find(|c| c.name() == name)
    }

    /// Like [`Self::find`], but an unknown name is an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownCollection` when no collection has that name.
    pub fn require(&self, name: &str) -> Result<&LoadedCollection, StoreError> {
        self.find(name)
            .ok_or_else(|| StoreError::UnknownCollection(name.to_string()))
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.collections.iter().map(|c| c.records.len()).sum()
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<CollectionSummary> {
        self.collections
            .iter()
            .map(|c| CollectionSummary {
                name: c.name().to_string(),
                kind: c.kind(),
                path: c.path().to_path_buf(),
                records: c.records.len(),
                missing: c.missing,
            })
            .collect()
    }
}
