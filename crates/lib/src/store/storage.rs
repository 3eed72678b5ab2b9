//! Reading and writing the store file.
//!
//! `init` and `add` need write access to the directory holding the store, for
//! the lock file and the temp file renamed over the store. `show` only needs
//! to read the store itself.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::platform::paths::temp_path_for;
use crate::section::Section;
use crate::store_lock::{LockMode, StoreLock, StoreLockError, is_unwritable};

use super::types::VersionStore;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("store not found: {} (run 'versions init' first)", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read store {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to resolve store path {}: {source}", path.display())]
  Resolve { path: PathBuf, source: io::Error },

  #[error("failed to parse store {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("failed to serialize store: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write store {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Lock(#[from] StoreLockError),
}

/// Result of setting one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
  /// The value the item held before, if any.
  pub previous: Option<String>,
  /// The value now stored.
  pub value: String,
}

impl AddOutcome {
  /// The item already existed and was overwritten.
  pub fn is_update(&self) -> bool {
    self.previous.is_some()
  }

  /// The item already held exactly this value.
  pub fn is_unchanged(&self) -> bool {
    self.previous.as_deref() == Some(self.value.as_str())
  }
}

/// Handle to a store file on disk.
///
/// Every mutation is a whole-document read-modify-write performed under an
/// exclusive lock, and writes replace the file by rename.
#[derive(Debug, Clone)]
pub struct VersionFile {
  path: PathBuf,
}

impl VersionFile {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn exists(&self) -> bool {
    self.path.is_file()
  }

  /// Reset the store to three empty sections, replacing any existing content.
  ///
  /// Creates the parent directory if needed.
  pub fn init(&self) -> Result<VersionStore, StoreError> {
    self.ensure_parent()?;
    let target = self.resolve()?;
    let _lock = StoreLock::acquire(&target, LockMode::Exclusive, "init")?;

    let store = VersionStore::new();
    self.write_to(&target, &store)?;
    info!(path = ?target, "initialized store");
    Ok(store)
  }

  /// Set `section[item] = value` and write the store back.
  ///
  /// The store must already exist.
  pub fn add(&self, section: Section, item: &str, value: &str) -> Result<AddOutcome, StoreError> {
    self.require_exists()?;
    let target = self.resolve()?;
    let _lock = StoreLock::acquire(&target, LockMode::Exclusive, "add")?;

    let mut store = self.load()?;
    let previous = store.set(section, item, value);
    self.write_to(&target, &store)?;

    info!(path = ?target, %section, item, value, previous = ?previous, "set item");
    Ok(AddOutcome {
      previous,
      value: value.to_string(),
    })
  }

  /// Load the store under a shared lock.
  ///
  /// Reading only needs access to the store file: if the lock file cannot be
  /// created because its directory is not writable, the store is read unlocked.
  pub fn read(&self) -> Result<VersionStore, StoreError> {
    self.require_exists()?;
    let target = self.resolve()?;
    let _lock = match StoreLock::acquire(&target, LockMode::Shared, "show") {
      Ok(lock) => Some(lock),
      Err(StoreLockError::OpenFile(err)) if is_unwritable(&err) => {
        debug!(path = ?target, error = %err, "lock file unavailable, reading unlocked");
        None
      }
      Err(err) => return Err(err.into()),
    };
    self.load()
  }

  /// Load and parse the store without locking.
  pub fn load(&self) -> Result<VersionStore, StoreError> {
    let content = fs::read_to_string(&self.path).map_err(|e| {
      if e.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound { path: self.path.clone() }
      } else {
        StoreError::Read {
          path: self.path.clone(),
          source: e,
        }
      }
    })?;

    let store = serde_json::from_str(&content).map_err(|e| StoreError::Parse {
      path: self.path.clone(),
      source: e,
    })?;
    debug!(path = ?self.path, bytes = content.len(), "loaded store");
    Ok(store)
  }

  /// Write the store without locking.
  pub fn save(&self, store: &VersionStore) -> Result<(), StoreError> {
    let target = self.resolve()?;
    self.write_to(&target, store)
  }

  /// The file the store actually lives in.
  ///
  /// Symlinks are followed so writes land in the link target instead of
  /// replacing the link. A store that does not exist yet resolves to itself.
  fn resolve(&self) -> Result<PathBuf, StoreError> {
    match dunce::canonicalize(&self.path) {
      Ok(resolved) => Ok(resolved),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(self.path.clone()),
      Err(e) => Err(StoreError::Resolve {
        path: self.path.clone(),
        source: e,
      }),
    }
  }

  /// Write to a sibling temp file, then rename it over `target`.
  ///
  /// The temp file takes the permissions of the file it replaces.
  fn write_to(&self, target: &Path, store: &VersionStore) -> Result<(), StoreError> {
    let temp_path = temp_path_for(target);
    let content = serde_json::to_string(store).map_err(StoreError::Serialize)?;

    fs::write(&temp_path, &content).map_err(|e| write_error(&temp_path, e))?;
    if let Ok(existing) = fs::metadata(target) {
      fs::set_permissions(&temp_path, existing.permissions()).map_err(|e| write_error(&temp_path, e))?;
    }
    fs::rename(&temp_path, target).map_err(|e| write_error(target, e))?;

    debug!(path = ?target, bytes = content.len(), "wrote store");
    Ok(())
  }

  fn require_exists(&self) -> Result<(), StoreError> {
    if self.path.exists() {
      Ok(())
    } else {
      Err(StoreError::NotFound { path: self.path.clone() })
    }
  }

  fn ensure_parent(&self) -> Result<(), StoreError> {
    match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => {
        fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir {
          path: parent.to_path_buf(),
          source: e,
        })
      }
      _ => Ok(()),
    }
  }
}

fn write_error(path: &Path, source: io::Error) -> StoreError {
  StoreError::Write {
    path: path.to_path_buf(),
    source,
  }
}
