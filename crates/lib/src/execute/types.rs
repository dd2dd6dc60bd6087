//! Types for step execution.
//!
//! This module defines the per-step error type and the report a run produces.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Why a single compile or documentation step failed.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// The program could not be found on `PATH`.
  #[error("executable not found: {program}")]
  NotFound { program: String },

  /// The working directory for the step does not exist.
  #[error("working directory does not exist: {}", dir.display())]
  MissingDirectory { dir: PathBuf },

  /// The process ran and exited unsuccessfully. `code` is `None` when it was
  /// killed by a signal.
  #[error("command failed with exit code {code:?}: {command}")]
  Failed { command: String, code: Option<i32> },

  /// Any other spawn or wait failure.
  #[error("failed to run {command}: {source}")]
  Io {
    command: String,
    #[source]
    source: std::io::Error,
  },
}

/// Which phase of the run a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
  Compile,
  Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum StepStatus {
  Succeeded,
  Failed { error: String },
  /// Not attempted because an earlier step failed under fail-fast.
  Skipped,
}

/// Outcome of one planned step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
  pub kind: StepKind,
  /// Source file for compiles, pass name for documentation steps.
  pub label: String,
  pub command: String,
  #[serde(flatten)]
  pub status: StepStatus,
  #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
  pub elapsed: Duration,
}

/// Result of a whole run, one entry per planned step in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
  pub steps: Vec<StepReport>,
}

impl RunReport {
  /// True when every planned step ran and succeeded.
  pub fn is_success(&self) -> bool {
    self.steps.iter().all(|s| s.status == StepStatus::Succeeded)
  }

  pub fn succeeded(&self) -> usize {
    self.count(|s| matches!(s, StepStatus::Succeeded))
  }

  pub fn failed(&self) -> usize {
    self.count(|s| matches!(s, StepStatus::Failed { .. }))
  }

  pub fn skipped(&self) -> usize {
    self.count(|s| matches!(s, StepStatus::Skipped))
  }

  pub fn elapsed(&self) -> Duration {
    self.steps.iter().map(|s| s.elapsed).sum()
  }

  fn count(&self, pred: impl Fn(&StepStatus) -> bool) -> usize {
    self.steps.iter().filter(|s| pred(&s.status)).count()
  }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_u64(duration.as_millis().try_into().unwrap_or(u64::MAX))
}
