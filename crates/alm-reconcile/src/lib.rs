//! # alm-reconcile
//!
//! Repairs for dangling references and detection of look-alike records.
//!
//! - [`similarity`]: the [`SimilarityStrategy`] trait and its implementations
//! - [`reconciler`]: best-match resolution of one identifier
//! - [`worklist`]: proposals for every still-dangling reference of a report
//! - [`rewrite`]: resolved proposals as a patch set for the patch applier
//! - [`duplicates`]: near-duplicate pairs across collections
//!
//! Nothing here writes files; applying a rewrite goes through `alm-store`.

pub mod duplicates;
pub mod error;
pub mod reconciler;
pub mod rewrite;
pub mod similarity;
pub mod worklist;

pub use error::ReconcileError;
pub use reconciler::{Candidate, FuzzyReconciler};
pub use similarity::{SimilarityStrategy, normalize, strategy_for};
