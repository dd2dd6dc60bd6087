//! Test utilities for wsbuild-lib.
//!
//! Provides a [`Runner`] double that records invocations instead of spawning
//! processes, with scripted failures.

use std::collections::HashSet;

use crate::execute::{ExecuteError, Runner};
use crate::invocation::Invocation;

#[derive(Debug, Default)]
pub struct RecordingRunner {
  /// Every invocation received, in order, including failed ones.
  pub invocations: Vec<Invocation>,
  /// Invocations whose final argument is in this set fail with exit code 1.
  failing: HashSet<String>,
}

impl RecordingRunner {
  pub fn failing<I, S>(last_args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      invocations: Vec::new(),
      failing: last_args.into_iter().map(Into::into).collect(),
    }
  }

  /// Recorded invocations of `program`.
  pub fn compiles<'a>(&'a self, program: &'a str) -> impl Iterator<Item = &'a Invocation> + 'a {
    self.invocations.iter().filter(move |inv| inv.program == program)
  }
}

impl Runner for RecordingRunner {
  fn run(&mut self, invocation: &Invocation) -> Result<(), ExecuteError> {
    self.invocations.push(invocation.clone());

    let last = invocation
      .args
      .last()
      .map(|a| a.to_string_lossy().into_owned())
      .unwrap_or_default();

    if self.failing.contains(&last) {
      return Err(ExecuteError::Failed {
        command: invocation.command_line(),
        code: Some(1),
      });
    }
    Ok(())
  }
}
