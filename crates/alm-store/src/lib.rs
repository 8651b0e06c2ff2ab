//! # alm-store
//!
//! Reading and rewriting the per-collection JSON files.
//!
//! - [`loader`]: BOM stripping and container-shape normalization
//! - [`snapshot`]: one read of every configured collection per call
//! - [`writer`]: whole-file atomic rewrites in the original container shape
//! - [`patch`]: shallow merge of partial records, planned then committed
//! - [`maintenance`]: duplicate removal and collection merge

pub mod error;
pub mod loader;
pub mod maintenance;
pub mod patch;
pub mod snapshot;
pub mod writer;

pub use error::StoreError;
pub use loader::{ContainerShape, LoadedCollection};
pub use snapshot::Snapshot;
