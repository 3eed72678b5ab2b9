//! versions-lib: Core types and logic for the version store
//!
//! This crate provides:
//! - `Section`: the three fixed categories of the store
//! - `VersionStore`: the JSON document mapping item names to versions
//! - `VersionFile`: locked, atomic load/save of a store on disk

pub mod consts;
pub mod platform;
pub mod section;
pub mod store;
pub mod store_lock;

pub use section::{ParseSectionError, Section};
pub use store::{AddOutcome, DocumentError, SectionItems, StoreError, VersionFile, VersionStore};
