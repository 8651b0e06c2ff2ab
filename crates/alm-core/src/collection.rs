//! Collection descriptors.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;

/// A named, persisted group of records of one kind.
///
/// Several collections of the same kind (e.g. one file per state) form one
/// logical collection for duplicate detection and reference resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CollectionSpec {
    pub name: String,
    pub kind: EntityKind,
    pub path: PathBuf,
}

impl CollectionSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: EntityKind, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            path: path.into(),
        }
    }
}
