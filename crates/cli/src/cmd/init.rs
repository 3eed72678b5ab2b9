//! Implementation of the `versions init` command.

use std::path::Path;

use anyhow::{Context, Result};

use versions_lib::VersionFile;

use crate::output::print_success;

/// Reset the store at `path` to three empty sections.
///
/// Any existing content is replaced.
pub fn cmd_init(path: &Path) -> Result<()> {
  let file = VersionFile::new(path);
  let replaced = file.exists();
  file
    .init()
    .with_context(|| format!("Failed to initialize store at {}", path.display()))?;

  if replaced {
    print_success(&format!("Reset version store at {}", path.display()));
  } else {
    print_success(&format!("Initialized version store at {}", path.display()));
  }
  Ok(())
}
