use crate::consts::{DEFAULT_STORE_FILENAME, LOCK_SUFFIX, STORE_FILE_ENV, TEMP_SUFFIX};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Returns the built-in store location, at the root of the system drive.
#[cfg(windows)]
pub fn default_store_path() -> PathBuf {
  let drive = std::env::var("SYSTEMDRIVE").unwrap_or_else(|_| "C:".to_string());
  PathBuf::from(format!("{}\\", drive)).join(DEFAULT_STORE_FILENAME)
}

/// Returns the built-in store location, at the root of the system drive.
#[cfg(not(windows))]
pub fn default_store_path() -> PathBuf {
  PathBuf::from("/").join(DEFAULT_STORE_FILENAME)
}

/// Returns the store location from the environment, falling back to the default.
///
/// An empty `VERSIONS_FILE` is treated as unset.
pub fn store_path() -> PathBuf {
  match std::env::var_os(STORE_FILE_ENV) {
    Some(path) if !path.is_empty() => PathBuf::from(path),
    _ => default_store_path(),
  }
}

/// Returns the sidecar lock file for a store.
pub fn lock_path_for(store: &Path) -> PathBuf {
  with_suffix(store, LOCK_SUFFIX)
}

/// Returns the sidecar file a store is written to before being renamed into place.
pub fn temp_path_for(store: &Path) -> PathBuf {
  with_suffix(store, TEMP_SUFFIX)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(suffix);
  PathBuf::from(name)
}
