//! The persisted version store document.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::section::Section;

/// Items of one section, in the order they were first added.
pub type SectionItems = IndexMap<String, String>;

/// Why a parsed JSON document is not a usable store.
#[derive(Debug, Error)]
pub enum DocumentError {
  #[error("missing section '{0}'")]
  MissingSection(Section),

  #[error("section '{section}' must map item names to strings: {source}")]
  InvalidSection {
    section: Section,
    source: serde_json::Error,
  },
}

/// The whole store document.
///
/// Each section maps an item name to its version string. All three section
/// keys are required on load; a document missing one is rejected rather than
/// silently repaired. Top-level keys this tool does not know about are kept
/// and written back where they were. Item and key order survive a load/save
/// cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStore {
  libraries: SectionItems,
  extensions: SectionItems,
  executables: SectionItems,
  extra: IndexMap<String, Value>,
  /// Top-level keys in document order.
  order: Vec<String>,
}

impl VersionStore {
  /// An empty store with all three sections present.
  pub fn new() -> Self {
    Self {
      libraries: SectionItems::new(),
      extensions: SectionItems::new(),
      executables: SectionItems::new(),
      extra: IndexMap::new(),
      order: Section::ALL.iter().map(|s| s.as_str().to_string()).collect(),
    }
  }

  /// Build a store from a parsed top-level JSON object.
  pub fn from_document(document: IndexMap<String, Value>) -> Result<Self, DocumentError> {
    let mut store = Self {
      order: Vec::with_capacity(document.len()),
      ..Self::new()
    };

    for (key, value) in document {
      match key.parse::<Section>() {
        Ok(section) => {
          *store.section_mut(section) =
            serde_json::from_value(value).map_err(|source| DocumentError::InvalidSection { section, source })?;
        }
        Err(_) => {
          store.extra.insert(key.clone(), value);
        }
      }
      store.order.push(key);
    }

    if let Some(missing) = Section::ALL
      .into_iter()
      .find(|s| !store.order.iter().any(|key| key == s.as_str()))
    {
      return Err(DocumentError::MissingSection(missing));
    }

    Ok(store)
  }

  pub fn section(&self, section: Section) -> &SectionItems {
    match section {
      Section::Libraries => &self.libraries,
      Section::Extensions => &self.extensions,
      Section::Executables => &self.executables,
    }
  }

  fn section_mut(&mut self, section: Section) -> &mut SectionItems {
    match section {
      Section::Libraries => &mut self.libraries,
      Section::Extensions => &mut self.extensions,
      Section::Executables => &mut self.executables,
    }
  }

  /// Top-level keys other than the three sections, in document order.
  pub fn extra(&self) -> &IndexMap<String, Value> {
    &self.extra
  }

  pub fn get(&self, section: Section, item: &str) -> Option<&str> {
    self.section(section).get(item).map(String::as_str)
  }

  /// Set `section[item] = value`, returning the value it replaced.
  ///
  /// A new item goes to the end of its section; an existing one keeps its place.
  pub fn set(&mut self, section: Section, item: impl Into<String>, value: impl Into<String>) -> Option<String> {
    self.section_mut(section).insert(item.into(), value.into())
  }

  /// Total number of items across all sections.
  pub fn len(&self) -> usize {
    Section::ALL.iter().map(|s| self.section(*s).len()).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl Default for VersionStore {
  fn default() -> Self {
    Self::new()
  }
}

impl Serialize for VersionStore {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.order.len()))?;
    for key in &self.order {
      match key.parse::<Section>() {
        Ok(section) => map.serialize_entry(key, self.section(section))?,
        Err(_) => {
          if let Some(value) = self.extra.get(key) {
            map.serialize_entry(key, value)?;
          }
        }
      }
    }
    map.end()
  }
}

impl<'de> Deserialize<'de> for VersionStore {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let document = IndexMap::<String, Value>::deserialize(deserializer)?;
    Self::from_document(document).map_err(serde::de::Error::custom)
  }
}
