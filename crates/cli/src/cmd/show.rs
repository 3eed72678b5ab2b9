//! Show command implementation.
//!
//! Prints every section of the store, or the raw document with `--json`.

use std::path::Path;

use anyhow::{Context, Result};

use versions_lib::{Section, VersionFile};

use crate::output::{print_info, print_json, print_stat, symbols};

pub fn cmd_show(path: &Path, json: bool) -> Result<()> {
  let file = VersionFile::new(path);
  let store = file
    .read()
    .with_context(|| format!("Failed to read store at {}", path.display()))?;

  if json {
    return print_json(&store);
  }

  if store.is_empty() {
    print_info(&format!("No versions recorded in {}", path.display()));
    println!();
  }

  for (index, section) in Section::ALL.iter().enumerate() {
    if index > 0 {
      println!();
    }
    println!("{}:", section);

    let items = store.section(*section);
    if items.is_empty() {
      println!("  {} (none)", symbols::INFO);
    }
    for (item, value) in items {
      print_stat(item, value);
    }
  }

  Ok(())
}
