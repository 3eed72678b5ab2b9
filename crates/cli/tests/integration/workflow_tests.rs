//! Multi-step runs of the CLI against a single store.

use predicates::prelude::*;
use versions_lib::Section;

use super::common::TestEnv;

#[test]
fn build_style_sequence_records_every_section() {
  let env = TestEnv::empty();
  env.versions_cmd().arg("init").assert().success();

  let steps = [
    ("libraries", "zlib", "1.3.1"),
    ("libraries", "openssl", "3.0.13"),
    ("extensions", "redis", "6.0.2"),
    ("executables", "php", "8.3.4"),
  ];
  for (section, item, value) in steps {
    env
      .versions_cmd()
      .args(["add", "-s", section, "-i", item, "-v", value])
      .assert()
      .success();
  }

  let store = env.store();
  assert_eq!(store.get(Section::Libraries, "zlib"), Some("1.3.1"));
  assert_eq!(store.get(Section::Libraries, "openssl"), Some("3.0.13"));
  assert_eq!(store.get(Section::Extensions, "redis"), Some("6.0.2"));
  assert_eq!(store.get(Section::Executables, "php"), Some("8.3.4"));
  assert_eq!(store.len(), 4);
}

#[test]
fn hand_edited_keys_survive_add() {
  let env = TestEnv::with_store(r#"{"libraries":{},"extensions":{},"executables":{},"built_on":"al2023"}"#);

  env
    .versions_cmd()
    .args(["add", "-s", "extensions", "-i", "apcu", "-v", "5.1.23"])
    .assert()
    .success();

  assert_eq!(
    env.raw_store(),
    r#"{"libraries":{},"extensions":{"apcu":"5.1.23"},"executables":{},"built_on":"al2023"}"#
  );
}

#[test]
fn store_missing_a_section_is_fatal() {
  let env = TestEnv::with_store(r#"{"libraries":{},"extensions":{}}"#);

  env
    .versions_cmd()
    .args(["add", "-s", "executables", "-i", "php", "-v", "8.3.4"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("executables"));

  assert_eq!(env.raw_store(), r#"{"libraries":{},"extensions":{}}"#);
}

#[test]
fn file_flag_wins_over_environment() {
  let env = TestEnv::empty();
  let other = env.temp.path().join("other.json");

  env
    .versions_cmd()
    .arg("init")
    .arg("--file")
    .arg(&other)
    .assert()
    .success();

  assert!(other.exists());
  assert!(!env.store_path.exists());
}

#[test]
fn verbose_logs_to_stderr_only() {
  let env = TestEnv::empty();

  env
    .versions_cmd()
    .args(["init", "--verbose"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Initialized"))
    .stderr(predicate::str::contains("initialized store"));
}
