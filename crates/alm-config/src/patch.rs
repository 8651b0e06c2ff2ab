//! Patch applier settings.

use serde::{Deserialize, Serialize};

fn default_metadata_keys() -> Vec<String> {
    vec!["meta".to_string(), "metadata".to_string()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatchConfig {
    /// Object-valued fields merged key-by-key instead of replaced.
    #[serde(default = "default_metadata_keys")]
    pub metadata_keys: Vec<String>,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            metadata_keys: default_metadata_keys(),
        }
    }
}
