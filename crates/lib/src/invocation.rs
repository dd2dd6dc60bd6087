//! Command lines for the compiler and the documentation toolchain.
//!
//! Every step of a run is described by an [`Invocation`] before anything is
//! spawned, so the whole run can be traced, dry-run or asserted on in tests.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, DocumentConfig, Entry};
use crate::options::RunOptions;

/// Prefix added to caller-supplied flag tokens.
pub const SWITCH_MARKER: &str = "-";

/// One external process to run: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<OsString>,
  pub cwd: PathBuf,
}

impl Invocation {
  pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.into(),
    }
  }

  pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Whether any argument equals `needle`.
  pub fn has_arg(&self, needle: &str) -> bool {
    self.args.iter().any(|a| a == needle)
  }

  /// Command line as a single shell-like string, for traces and reports.
  pub fn command_line(&self) -> String {
    std::iter::once(self.program.clone())
      .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.command_line())
  }
}

/// Flags for a compile, in invocation order.
///
/// Configured defaults come first (unless suppressed), followed by the
/// caller's tokens in the order given, each with [`SWITCH_MARKER`] prepended.
/// Later flags therefore win where the compiler lets a flag be overridden.
pub fn compile_flags(config: &BuildConfig, options: &RunOptions) -> Vec<String> {
  let defaults = (!options.suppress_flags).then_some(config.flags.iter().cloned());
  defaults
    .into_iter()
    .flatten()
    .chain(options.flags.iter().map(|token| format!("{SWITCH_MARKER}{token}")))
    .collect()
}

/// Output path for an entry, with the cross target's suffix when requested.
pub fn output_path(config: &BuildConfig, entry: &Entry, cross_compile: bool) -> PathBuf {
  let mut name = entry.output.clone();
  if cross_compile {
    name.push_str(config.cross_target.exe_suffix());
  }
  config.output_dir.join(name)
}

/// `<compiler> <flags...> -o <output> <input>`, run from the config root.
pub fn compile(config: &BuildConfig, options: &RunOptions, entry: &Entry) -> Invocation {
  let input = config.source_dir.join(&entry.file);
  Invocation::new(&config.compiler, &config.root)
    .args(compile_flags(config, options))
    .arg("-o")
    .arg(output_path(config, entry, options.cross_compile))
    .arg(input)
}

/// Names of the documentation passes, in execution order.
pub const DOCUMENT_PASSES: [&str; 4] = ["pass1", "bibliography", "pass2", "pass3"];

/// The four documentation passes, run inside `dir`.
///
/// The typesetter runs once, the bibliography tool resolves citations against
/// the first pass's output, and two further typesetter runs settle the
/// cross-references.
pub fn document(doc: &DocumentConfig, dir: &Path) -> [(&'static str, Invocation); 4] {
  let typeset = || Invocation::new(&doc.typesetter, dir).arg(&doc.master);
  [
    (DOCUMENT_PASSES[0], typeset()),
    (
      DOCUMENT_PASSES[1],
      Invocation::new(&doc.bibliography, dir).arg(doc.master_stem()),
    ),
    (DOCUMENT_PASSES[2], typeset()),
    (DOCUMENT_PASSES[3], typeset()),
  ]
}
