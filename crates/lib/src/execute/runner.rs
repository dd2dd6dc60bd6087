//! Process runners.
//!
//! The driver hands every [`Invocation`] to a [`Runner`]. [`ProcessRunner`]
//! spawns real processes; [`DryRun`] spawns nothing.

use std::io::ErrorKind;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::execute::types::ExecuteError;
use crate::invocation::Invocation;

/// Executes one invocation to completion.
pub trait Runner {
  fn run(&mut self, invocation: &Invocation) -> Result<(), ExecuteError>;
}

impl<R: Runner + ?Sized> Runner for &mut R {
  fn run(&mut self, invocation: &Invocation) -> Result<(), ExecuteError> {
    (**self).run(invocation)
  }
}

/// Spawns the invocation as a child process and waits for it.
///
/// The child inherits stdio so compiler diagnostics reach the terminal
/// unchanged. The working directory is set on the child only.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
  fn run(&mut self, invocation: &Invocation) -> Result<(), ExecuteError> {
    if !invocation.cwd.is_dir() {
      return Err(ExecuteError::MissingDirectory {
        dir: invocation.cwd.clone(),
      });
    }

    debug!(program = %invocation.program, cwd = %invocation.cwd.display(), "spawning process");

    let status = Command::new(&invocation.program)
      .args(&invocation.args)
      .current_dir(&invocation.cwd)
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .map_err(|source| match source.kind() {
        ErrorKind::NotFound => ExecuteError::NotFound {
          program: invocation.program.clone(),
        },
        _ => ExecuteError::Io {
          command: invocation.command_line(),
          source,
        },
      })?;

    if !status.success() {
      return Err(ExecuteError::Failed {
        command: invocation.command_line(),
        code: status.code(),
      });
    }

    Ok(())
  }
}

/// Accepts every invocation without running it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRun;

impl Runner for DryRun {
  fn run(&mut self, invocation: &Invocation) -> Result<(), ExecuteError> {
    debug!(command = %invocation, "dry run, not spawning");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[cfg(unix)]
  #[test]
  fn successful_process_is_ok() {
    let temp = TempDir::new().unwrap();
    let inv = Invocation::new("true", temp.path());
    assert!(ProcessRunner.run(&inv).is_ok());
  }

  #[cfg(unix)]
  #[test]
  fn non_zero_exit_is_failed_with_code() {
    let temp = TempDir::new().unwrap();
    let inv = Invocation::new("sh", temp.path()).args(["-c", "exit 3"]);

    let err = ProcessRunner.run(&inv).unwrap_err();
    assert!(matches!(err, ExecuteError::Failed { code: Some(3), ref command } if command == "sh -c exit 3"));
  }

  #[cfg(unix)]
  #[test]
  fn child_runs_in_invocation_cwd() {
    let temp = TempDir::new().unwrap();
    let inv = Invocation::new("sh", temp.path()).args(["-c", "touch marker"]);

    ProcessRunner.run(&inv).unwrap();
    assert!(temp.path().join("marker").exists());
  }

  #[test]
  fn missing_program_is_not_found() {
    let temp = TempDir::new().unwrap();
    let inv = Invocation::new("wsbuild-no-such-compiler", temp.path());

    let err = ProcessRunner.run(&inv).unwrap_err();
    assert!(matches!(err, ExecuteError::NotFound { ref program } if program == "wsbuild-no-such-compiler"));
  }

  #[test]
  fn missing_cwd_is_reported_before_spawn() {
    let temp = TempDir::new().unwrap();
    let inv = Invocation::new("true", temp.path().join("documentation"));

    let err = ProcessRunner.run(&inv).unwrap_err();
    assert!(matches!(err, ExecuteError::MissingDirectory { .. }));
  }

  #[test]
  fn dry_run_never_fails() {
    let inv = Invocation::new("wsbuild-no-such-compiler", "/nonexistent");
    assert!(DryRun.run(&inv).is_ok());
  }
}
