//! wsbuild-lib: build driver for small native-code projects
//!
//! This crate provides the pieces behind the `wsbuild` binary:
//! - `BuildConfig`: the immutable compiler settings and build registry
//! - `RunOptions`: what a single run should build and how
//! - `Invocation`: one compiler or typesetter command line
//! - `execute::run`: sequential execution with a per-step report

pub mod config;
pub mod execute;
pub mod invocation;
pub mod options;
pub mod platform;
pub mod util;

pub use config::{BuildConfig, ConfigError, DocumentConfig, Entry, Registry};
pub use execute::{DryRun, ExecuteError, ProcessRunner, RunReport, Runner, StepKind, StepStatus, plan, run};
pub use invocation::Invocation;
pub use options::{DocumentMode, FailurePolicy, RunOptions};
pub use platform::Os;
