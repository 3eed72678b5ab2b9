//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;
use versions_lib::VersionStore;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the store file.
pub struct TestEnv {
  pub temp: TempDir,
  pub store_path: PathBuf,
}

impl TestEnv {
  /// Create an environment with no store file yet.
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("versions.json");
    Self { temp, store_path }
  }

  /// Create an environment with the store file holding `content`.
  pub fn with_store(content: &str) -> Self {
    let env = Self::empty();
    std::fs::write(&env.store_path, content).unwrap();
    env
  }

  /// Parse the store file as it currently is on disk.
  pub fn store(&self) -> VersionStore {
    let content = std::fs::read_to_string(&self.store_path).unwrap();
    serde_json::from_str(&content).unwrap()
  }

  pub fn raw_store(&self) -> String {
    std::fs::read_to_string(&self.store_path).unwrap()
  }

  /// Get a pre-configured Command for the versions binary.
  ///
  /// Points `VERSIONS_FILE` at the isolated store and clears `RUST_LOG`.
  pub fn versions_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("versions");
    cmd.env("VERSIONS_FILE", &self.store_path);
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
