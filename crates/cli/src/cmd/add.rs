//! Implementation of the `versions add` command.

use std::path::Path;

use anyhow::{Context, Result};

use versions_lib::{Section, VersionFile};

use crate::output::{print_info, print_success};

/// Set `section[item] = value` in the store at `path`.
pub fn cmd_add(path: &Path, section: Section, item: &str, value: &str) -> Result<()> {
  let file = VersionFile::new(path);
  let outcome = file
    .add(section, item, value)
    .with_context(|| format!("Failed to add {}.{} to {}", section, item, path.display()))?;

  if outcome.is_unchanged() {
    print_info(&format!("{}.{} is already {}", section, item, value));
  } else if let Some(previous) = &outcome.previous {
    print_success(&format!("Updated {}.{}: {} -> {}", section, item, previous, value));
  } else {
    print_success(&format!("Added {}.{} = {}", section, item, value));
  }

  Ok(())
}
