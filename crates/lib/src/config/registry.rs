//! The build registry: an ordered, duplicate-free map of source file to
//! output executable name.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// One source file and the executable it compiles to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
  /// Source file name, relative to the source directory. Doubles as the
  /// registry key.
  pub file: String,
  /// Executable name, relative to the output directory.
  pub output: String,
}

impl Entry {
  pub fn new(file: impl Into<String>, output: impl Into<String>) -> Self {
    Self {
      file: file.into(),
      output: output.into(),
    }
  }
}

/// Registry entries in declaration order.
///
/// Construction validates that the registry is non-empty, keys are unique and
/// no output name is blank, so every `Registry` value upholds those
/// properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Registry {
  entries: Vec<Entry>,
}

impl Registry {
  pub fn new(entries: Vec<Entry>) -> Result<Self, ConfigError> {
    if entries.is_empty() {
      return Err(ConfigError::EmptyRegistry);
    }

    let mut seen = HashSet::new();
    for entry in &entries {
      if entry.output.trim().is_empty() {
        return Err(ConfigError::EmptyOutput(entry.file.clone()));
      }
      if !seen.insert(entry.file.as_str()) {
        return Err(ConfigError::DuplicateEntry(entry.file.clone()));
      }
    }

    Ok(Self { entries })
  }

  /// Look up an entry by its source file name.
  pub fn get(&self, file: &str) -> Option<&Entry> {
    self.entries.iter().find(|e| e.file == file)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Resolve the entries a run should build.
  ///
  /// `None` selects the whole registry in declaration order. An explicit
  /// selection is returned in the caller's order and must be non-empty, free
  /// of repeats, and name only registered files.
  pub fn select(&self, sources: Option<&[String]>) -> Result<Vec<&Entry>, ConfigError> {
    let Some(sources) = sources else {
      return Ok(self.entries.iter().collect());
    };

    if sources.is_empty() {
      return Err(ConfigError::EmptySelection);
    }

    let mut seen = HashSet::new();
    sources
      .iter()
      .map(|name| {
        if !seen.insert(name.as_str()) {
          return Err(ConfigError::DuplicateSource(name.clone()));
        }
        self.get(name).ok_or_else(|| ConfigError::UnknownSource(name.clone()))
      })
      .collect()
  }
}

impl<'a> IntoIterator for &'a Registry {
  type Item = &'a Entry;
  type IntoIter = std::slice::Iter<'a, Entry>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.iter()
  }
}
