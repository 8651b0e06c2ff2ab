//! # alm-config
//!
//! Layered configuration loading for Almanac using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ALMANAC_*` prefix, `__` as separator)
//! 2. Project-level `.almanac/config.toml`
//! 3. User-level `~/.config/almanac/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ALMANAC_RECONCILE__MAX_DISTANCE` -> `reconcile.max_distance`,
//! `ALMANAC_DATASET__ROOT` -> `dataset.root`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use alm_config::AlmanacConfig;
//!
//! let config = AlmanacConfig::load_for(Path::new(".")).expect("config");
//! let collections = config.dataset.resolve(Path::new(".")).expect("dataset");
//! println!("{} collections", collections.len());
//! ```

mod audit;
mod dataset;
mod error;
mod patch;
mod reconcile;

pub use audit::AuditConfig;
pub use dataset::{CollectionEntry, DatasetConfig, ScanEntry};
pub use error::ConfigError;
pub use patch::PatchConfig;
pub use reconcile::ReconcileConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local configuration directory.
pub const PROJECT_DIR: &str = ".almanac";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlmanacConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub patch: PatchConfig,
}

impl AlmanacConfig {
    /// Load configuration for the project rooted at `project_root`.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_for(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `<project_root>/.env` (or `./.env`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv(project_root: &Path) -> Result<Self, ConfigError> {
        let env_path = project_root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        } else {
            let _ = dotenvy::dotenv();
        }
        Self::load_for(project_root)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = Self::project_config_path(project_root);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("ALMANAC_").split("__"))
    }

    /// Check cross-field constraints figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reconcile.validate()?;
        if self.audit.pending_field.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "audit.pending_field".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_DIR).join("config.toml")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("almanac").join("config.toml"))
    }
}
