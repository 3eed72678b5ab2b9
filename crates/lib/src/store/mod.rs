//! The version store: the JSON document and the file that holds it.
//!
//! # Layout
//!
//! ```text
//! /versions.json        # the store document
//! /versions.json.lock   # advisory lock, held for each read-modify-write
//! /versions.json.tmp    # in-flight write, renamed over the store
//! ```
//!
//! When the store path is a symlink, the lock and temp files sit next to the
//! file it points at.

mod storage;
mod types;

pub use storage::{AddOutcome, StoreError, VersionFile};
pub use types::{DocumentError, SectionItems, VersionStore};
