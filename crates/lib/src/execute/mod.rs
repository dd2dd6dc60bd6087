//! Run execution.
//!
//! This module turns a configuration and run options into an ordered list of
//! steps and executes them one at a time. It handles:
//! - Validating the selection before anything is spawned
//! - Compile steps in registry or caller order
//! - The documentation passes
//! - Fail-fast or continue-on-error failure handling

pub mod runner;
pub mod types;

use std::time::Instant;

use tracing::{error, info, warn};

use crate::config::{BuildConfig, ConfigError};
use crate::invocation::{self, Invocation};
use crate::options::{FailurePolicy, RunOptions};

pub use runner::{DryRun, ProcessRunner, Runner};
pub use types::{ExecuteError, RunReport, StepKind, StepReport, StepStatus};

/// A step ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
  pub kind: StepKind,
  pub label: String,
  pub invocation: Invocation,
}

/// Build the ordered step list for a run.
///
/// Fails with a [`ConfigError`] when the selection names unknown or repeated
/// sources, or when documentation is requested without documentation
/// settings. No process has been spawned at that point.
pub fn plan(config: &BuildConfig, options: &RunOptions) -> Result<Vec<Step>, ConfigError> {
  let entries = config.registry.select(options.sources.as_deref())?;

  let document = if options.document.documents() {
    let doc = config.document.as_ref().zip(config.document_dir());
    Some(doc.ok_or(ConfigError::DocumentationUnavailable)?)
  } else {
    None
  };

  let mut steps = Vec::new();

  if options.document.compiles() {
    steps.extend(entries.into_iter().map(|entry| Step {
      kind: StepKind::Compile,
      label: entry.file.clone(),
      invocation: invocation::compile(config, options, entry),
    }));
  }

  if let Some((doc, dir)) = document {
    steps.extend(invocation::document(doc, &dir).into_iter().map(|(pass, inv)| Step {
      kind: StepKind::Document,
      label: pass.to_string(),
      invocation: inv,
    }));
  }

  Ok(steps)
}

/// Execute a run.
///
/// Steps run sequentially through `runner`. Failures are recorded in the
/// report; under [`FailurePolicy::FailFast`] the first failure marks every
/// remaining step as skipped. Only configuration problems are returned as
/// `Err`.
pub fn run<R: Runner + ?Sized>(
  config: &BuildConfig,
  options: &RunOptions,
  runner: &mut R,
) -> Result<RunReport, ConfigError> {
  let steps = plan(config, options)?;
  info!(steps = steps.len(), policy = ?options.policy, "starting build");

  let mut report = RunReport::default();
  let mut halted = false;

  for step in steps {
    let command = step.invocation.command_line();

    if halted {
      warn!(step = %step.label, "skipping step after earlier failure");
      report.steps.push(StepReport {
        kind: step.kind,
        label: step.label,
        command,
        status: StepStatus::Skipped,
        elapsed: Default::default(),
      });
      continue;
    }

    info!(step = %step.label, command = %command, "running step");
    let started = Instant::now();
    let result = runner.run(&step.invocation);
    let elapsed = started.elapsed();

    let status = match result {
      Ok(()) => {
        info!(step = %step.label, "step succeeded");
        StepStatus::Succeeded
      }
      Err(e) => {
        error!(step = %step.label, error = %e, "step failed");
        halted = options.policy == FailurePolicy::FailFast;
        StepStatus::Failed { error: e.to_string() }
      }
    };

    report.steps.push(StepReport {
      kind: step.kind,
      label: step.label,
      command,
      status,
      elapsed,
    });
  }

  info!(
    succeeded = report.succeeded(),
    failed = report.failed(),
    skipped = report.skipped(),
    "build complete"
  );

  Ok(report)
}
