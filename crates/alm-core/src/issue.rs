//! Issues reported by the consistency checker.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::IssueKind;
use crate::reference::Reference;

/// Position of one record inside the loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub collection: String,
    pub path: PathBuf,
    pub record_index: usize,
}

/// One integrity problem found in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Issue {
    pub kind: IssueKind,
    /// Collection holding the offending record.
    pub collection: String,
    /// File backing that collection.
    pub path: PathBuf,
    pub record_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_name: Option<String>,
    pub detail: String,
    /// The offending reference, for reference-level issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    /// Every occurrence, for `DUPLICATE_ID`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub occurrences: Vec<Location>,
}

impl Issue {
    /// Start an issue at `location`; identity and extras are filled in by
    /// the builder methods.
    #[must_use]
    pub fn new(kind: IssueKind, location: &Location, detail: impl Into<String>) -> Self {
        Self {
            kind,
            collection: location.collection.clone(),
            path: location.path.clone(),
            record_index: location.record_index,
            record_id: None,
            record_name: None,
            detail: detail.into(),
            reference: None,
            occurrences: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_record(mut self, id: Option<&str>, name: Option<&str>) -> Self {
        self.record_id = id.map(ToString::to_string);
        self.record_name = name.map(ToString::to_string);
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }

    #[must_use]
    pub fn with_occurrences(mut self, occurrences: Vec<Location>) -> Self {
        self.occurrences = occurrences;
        self
    }

    /// Short label for the offending record: `id (name)`, `id`, or `#index`.
    #[must_use]
    pub fn record_label(&self) -> String {
        match (&self.record_id, &self.record_name) {
            (Some(id), Some(name)) => format!("{id} ({name})"),
            (Some(id), None) => id.clone(),
            (None, Some(name)) => format!("#{} ({name})", self.record_index),
            (None, None) => format!("#{}", self.record_index),
        }
    }
}
