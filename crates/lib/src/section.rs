//! The three fixed top-level categories of the version store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A top-level category in the version store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
  Libraries,
  Extensions,
  Executables,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid section '{0}' (expected one of: libraries, extensions, executables)")]
pub struct ParseSectionError(pub String);

impl Section {
  /// All sections, in document order.
  pub const ALL: [Section; 3] = [Section::Libraries, Section::Extensions, Section::Executables];

  pub fn as_str(&self) -> &'static str {
    match self {
      Section::Libraries => "libraries",
      Section::Extensions => "extensions",
      Section::Executables => "executables",
    }
  }
}

impl fmt::Display for Section {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Section {
  type Err = ParseSectionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "libraries" => Ok(Section::Libraries),
      "extensions" => Ok(Section::Extensions),
      "executables" => Ok(Section::Executables),
      other => Err(ParseSectionError(other.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_every_section_name() {
    for section in Section::ALL {
      assert_eq!(section.as_str().parse::<Section>().unwrap(), section);
    }
  }

  #[test]
  fn rejects_unknown_and_miscased_names() {
    assert_eq!(
      "packages".parse::<Section>(),
      Err(ParseSectionError("packages".to_string()))
    );
    assert!("Libraries".parse::<Section>().is_err());
    assert!("".parse::<Section>().is_err());
  }

  #[test]
  fn display_matches_document_key() {
    assert_eq!(Section::Extensions.to_string(), "extensions");
    assert_eq!(serde_json::to_string(&Section::Executables).unwrap(), "\"executables\"");
  }
}
