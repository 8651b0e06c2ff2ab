//! # alm-core
//!
//! Core types shared across all Almanac crates.
//!
//! This crate provides the foundational types for auditing the college and
//! exam dataset:
//! - `Record`, a thin wrapper over one JSON entry with typed accessors
//! - Collection descriptors (`CollectionSpec`)
//! - Entity kinds, issue kinds, and similarity strategy enums
//! - References between records and the field paths they come from
//! - Issues produced by the consistency checker
//! - Patch sets consumed by the patch applier
//! - CLI response types (audit report, patch / reconcile outcomes)
//! - Cross-cutting error types

pub mod collection;
pub mod enums;
pub mod errors;
pub mod fields;
pub mod issue;
pub mod patch;
pub mod record;
pub mod reference;
pub mod responses;
