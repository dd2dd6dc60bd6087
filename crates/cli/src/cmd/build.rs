//! Implementation of the default `wsbuild` action.
//!
//! Compiles the selected registry entries and, when asked, typesets the
//! documentation, then prints a summary of every step.

use std::process::ExitCode;

use anyhow::Result;
use serde::Serialize;

use wsbuild_lib::execute::{ExecuteError, StepStatus};
use wsbuild_lib::{BuildConfig, DryRun, Invocation, ProcessRunner, RunOptions, RunReport, Runner, run};

use crate::output::{
  OutputFormat, format_duration, print_calling, print_error, print_info, print_json, print_skipped, print_stat,
  print_success, print_warning,
};

/// Prints each command line before handing it to the wrapped runner.
struct Traced<R> {
  inner: R,
  echo: bool,
}

impl<R: Runner> Runner for Traced<R> {
  fn run(&mut self, invocation: &Invocation) -> Result<(), ExecuteError> {
    if self.echo {
      print_calling(&invocation.command_line());
    }
    self.inner.run(invocation)
  }
}

#[derive(Serialize)]
struct Summary<'a> {
  success: bool,
  #[serde(flatten)]
  report: &'a RunReport,
}

/// Execute a build run.
///
/// Returns a failing exit code when any step failed or was skipped;
/// configuration problems are returned as errors before anything runs.
pub fn cmd_build(config: &BuildConfig, options: &RunOptions, dry_run: bool, format: OutputFormat) -> Result<ExitCode> {
  let echo = !format.is_json();

  if echo {
    print_info("Beginning build.");
    if dry_run {
      print_warning("Dry run: commands are printed but not executed");
    }
  }

  let report = if dry_run {
    run(config, options, &mut Traced { inner: DryRun, echo })?
  } else {
    run(config, options, &mut Traced {
      inner: ProcessRunner,
      echo,
    })?
  };

  if format.is_json() {
    print_json(&Summary {
      success: report.is_success(),
      report: &report,
    })?;
  } else {
    print_report(&report);
  }

  Ok(if report.is_success() {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}

fn print_report(report: &RunReport) {
  for step in &report.steps {
    match &step.status {
      StepStatus::Failed { error } => print_error(&format!("{}: {}", step.label, error)),
      StepStatus::Skipped => print_skipped(&format!("skipped {}", step.label)),
      StepStatus::Succeeded => {}
    }
  }

  println!();
  print_stat("Succeeded", &report.succeeded().to_string());
  print_stat("Failed", &report.failed().to_string());
  print_stat("Skipped", &report.skipped().to_string());
  print_stat("Elapsed", &format_duration(report.elapsed()));
  println!();

  if report.is_success() {
    print_success("Done!");
  } else {
    print_error("Build finished with failures");
  }
}
