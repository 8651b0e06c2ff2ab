use std::path::Path;

use alm_audit::AuditOptions;
use alm_config::AlmanacConfig;
use alm_core::collection::CollectionSpec;
use alm_store::Snapshot;
use alm_store::patch::MergeOptions;
use anyhow::Context;

/// Configuration and the resolved dataset layout for one project.
pub struct AppContext {
    pub config: AlmanacConfig,
    pub collections: Vec<CollectionSpec>,
}

impl AppContext {
    pub fn init(project_root: &Path) -> anyhow::Result<Self> {
        let config = AlmanacConfig::load_with_dotenv(project_root)
            .context("failed to load almanac configuration")?;
        let collections = config
            .dataset
            .resolve(project_root)
            .context("failed to resolve dataset layout")?;

        if collections.is_empty() {
            tracing::warn!(
                root = %project_root.display(),
                "no collections configured or found; nothing to audit"
            );
        }
        tracing::debug!(
            root = %project_root.display(),
            collections = collections.len(),
            "initialized application context"
        );

        Ok(Self {
            config,
            collections,
        })
    }

    /// Read every collection once for the duration of one command.
    #[must_use]
    pub fn load_snapshot(&self) -> Snapshot {
        Snapshot::load(&self.collections)
    }

    #[must_use]
    pub fn audit_options(&self) -> AuditOptions {
        AuditOptions::from(&self.config.audit)
    }

    #[must_use]
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            metadata_keys: self.config.patch.metadata_keys.clone(),
        }
    }
}
