//! Caller-supplied settings for one run of the driver.

/// Whether, and when, the documentation sequence runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentMode {
  /// Compile only.
  #[default]
  Skip,
  /// Compile, then build the documentation.
  After,
  /// Build the documentation without compiling.
  Only,
}

impl DocumentMode {
  pub fn compiles(self) -> bool {
    !matches!(self, DocumentMode::Only)
  }

  pub fn documents(self) -> bool {
    !matches!(self, DocumentMode::Skip)
  }
}

/// What happens to the rest of a run once a step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
  /// Stop at the first failed step and skip the remainder.
  #[default]
  FailFast,
  /// Attempt every step regardless of earlier failures.
  Continue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
  /// Registry keys to build, in order. `None` builds the whole registry.
  pub sources: Option<Vec<String>>,
  /// Extra compiler flags without their leading `-`.
  pub flags: Vec<String>,
  /// Leave the configured default flags out of every compile.
  pub suppress_flags: bool,
  /// Append the cross target's executable suffix to every output.
  pub cross_compile: bool,
  pub document: DocumentMode,
  pub policy: FailurePolicy,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_compile_everything_and_fail_fast() {
    let options = RunOptions::default();
    assert!(options.sources.is_none());
    assert_eq!(options.document, DocumentMode::Skip);
    assert_eq!(options.policy, FailurePolicy::FailFast);
  }

  #[test]
  fn document_mode_phases() {
    assert!(DocumentMode::Skip.compiles() && !DocumentMode::Skip.documents());
    assert!(DocumentMode::After.compiles() && DocumentMode::After.documents());
    assert!(!DocumentMode::Only.compiles() && DocumentMode::Only.documents());
  }
}
