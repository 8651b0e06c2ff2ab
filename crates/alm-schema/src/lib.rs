//! # alm-schema
//!
//! JSON Schemas for the documents Almanac reads and writes.
//!
//! Types are defined in `alm-core` with `#[derive(JsonSchema)]`; this crate
//! collects them in a [`SchemaRegistry`] used to print schemas (`alm schema`)
//! and to validate incoming patch sets and reports before they are trusted.

pub mod error;
pub mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
