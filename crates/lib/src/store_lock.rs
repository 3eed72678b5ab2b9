//! Advisory locking of the store file.
//!
//! The lock is taken on a sidecar file (`<store>.lock`) rather than on the
//! store itself, because writes replace the store by rename. Locks never
//! wait: if another process holds the store, acquiring fails at once and the
//! error names the holder when it can.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::platform::paths::lock_path_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
  /// Readers; any number may hold the store together.
  Shared,
  /// A single writer, recorded in the lock file.
  Exclusive,
}

/// The process holding an exclusive lock, as recorded in the lock file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockHolder {
  pub pid: u32,
  pub command: String,
  pub since_unix: u64,
  pub store: PathBuf,
}

impl LockHolder {
  fn current(command: &str, store: &Path) -> Self {
    Self {
      pid: std::process::id(),
      command: command.to_string(),
      since_unix: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default(),
      store: store.to_path_buf(),
    }
  }

  fn write_to(&self, file: &File) -> Result<(), StoreLockError> {
    file.set_len(0).map_err(StoreLockError::RecordHolder)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer(&mut writer, self).map_err(|e| StoreLockError::RecordHolder(io::Error::other(e)))?;
    writer.flush().map_err(StoreLockError::RecordHolder)
  }

  fn read_from(lock_path: &Path) -> Option<Self> {
    let mut contents = String::new();
    File::open(lock_path).ok()?.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
  }
}

#[derive(Debug, Error)]
pub enum StoreLockError {
  #[error(
    "{} is in use by 'versions {}' (pid {}, since unix time {}); if that process is gone, delete {}",
    holder.store.display(),
    holder.command,
    holder.pid,
    holder.since_unix,
    lock_path.display()
  )]
  Busy { holder: LockHolder, lock_path: PathBuf },

  #[error(
    "{} is in use by another process; if none is running, delete {}",
    store.display(),
    lock_path.display()
  )]
  BusyUnknown { store: PathBuf, lock_path: PathBuf },

  #[error("failed to open lock file: {0}")]
  OpenFile(#[source] io::Error),

  #[error("failed to record lock holder: {0}")]
  RecordHolder(#[source] io::Error),

  #[error("failed to lock store: {0}")]
  LockFailed(#[source] io::Error),
}

/// True when an I/O error means the location cannot be written to at all.
pub fn is_unwritable(err: &io::Error) -> bool {
  matches!(
    err.kind(),
    io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem
  )
}

/// A held lock on a store. Released when dropped.
#[derive(Debug)]
pub struct StoreLock {
  _file: File,
  path: PathBuf,
}

impl StoreLock {
  /// Lock `store` in `mode`, recording `command` as the holder when exclusive.
  ///
  /// The directory containing the store must already exist. A shared lock
  /// falls back to opening an existing lock file read-only when the
  /// directory is not writable.
  pub fn acquire(store: &Path, mode: LockMode, command: &str) -> Result<Self, StoreLockError> {
    let path = lock_path_for(store);
    let file = open_lock_file(&path, mode)?;

    match try_lock(&file, mode) {
      Ok(()) => {}
      Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Err(busy(store, &path)),
      Err(err) => return Err(StoreLockError::LockFailed(err)),
    }

    if mode == LockMode::Exclusive {
      LockHolder::current(command, store).write_to(&file)?;
    }

    debug!(path = ?path, ?mode, command, "acquired store lock");
    Ok(Self { _file: file, path })
  }

  /// Holder recorded through this handle.
  #[cfg(test)]
  fn holder(&self) -> io::Result<LockHolder> {
    use std::io::{Seek, SeekFrom};

    let mut file = &self._file;
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    serde_json::from_str(&contents).map_err(io::Error::other)
  }
}

impl Drop for StoreLock {
  fn drop(&mut self) {
    debug!(path = ?self.path, "released store lock");
  }
}

fn open_lock_file(path: &Path, mode: LockMode) -> Result<File, StoreLockError> {
  let created = OpenOptions::new()
    .read(true)
    .write(true)
    .create(true)
    .truncate(false)
    .open(path);

  match created {
    Ok(file) => Ok(file),
    Err(err) if mode == LockMode::Shared && is_unwritable(&err) => {
      File::open(path).map_err(|_| StoreLockError::OpenFile(err))
    }
    Err(err) => Err(StoreLockError::OpenFile(err)),
  }
}

fn busy(store: &Path, lock_path: &Path) -> StoreLockError {
  match LockHolder::read_from(lock_path) {
    Some(holder) => StoreLockError::Busy {
      holder,
      lock_path: lock_path.to_path_buf(),
    },
    None => StoreLockError::BusyUnknown {
      store: store.to_path_buf(),
      lock_path: lock_path.to_path_buf(),
    },
  }
}

#[cfg(unix)]
fn try_lock(file: &File, mode: LockMode) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  let operation = match mode {
    LockMode::Shared => FlockOperation::NonBlockingLockShared,
    LockMode::Exclusive => FlockOperation::NonBlockingLockExclusive,
  };

  flock(file.as_fd(), operation).map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(windows)]
fn try_lock(file: &File, mode: LockMode) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::HANDLE;
  use windows_sys::Win32::Storage::FileSystem::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx};

  let handle = file.as_raw_handle() as HANDLE;
  let flags = match mode {
    LockMode::Shared => LOCKFILE_FAIL_IMMEDIATELY,
    LockMode::Exclusive => LOCKFILE_FAIL_IMMEDIATELY | LOCKFILE_EXCLUSIVE_LOCK,
  };

  // SAFETY: a zeroed OVERLAPPED is valid, and `file` owns the handle for the call.
  let locked = unsafe {
    let mut overlapped = std::mem::zeroed();
    LockFileEx(handle, flags, 0, 1, 0, &mut overlapped)
  };

  if locked == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}
