mod cmd;
mod output;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use output::OutputFormat;
use wsbuild_lib::config::CONFIG_FILENAME;
use wsbuild_lib::{BuildConfig, ConfigError, DocumentMode, FailurePolicy, RunOptions};

/// wsbuild - compile a fixed set of sources and typeset their report
#[derive(Parser, Debug)]
#[command(name = "wsbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the configuration file
  #[arg(short, long, default_value = CONFIG_FILENAME)]
  config: PathBuf,

  /// Registry sources to compile (default: all, in registry order)
  #[arg(short, long, num_args = 1..)]
  sources: Option<Vec<String>>,

  /// Additional compiler flags. The leading "-" should be omitted.
  #[arg(short, long, num_args = 0..)]
  flags: Vec<String>,

  /// Suppress the default compiler flags
  #[arg(long)]
  suppress_flags: bool,

  /// Append the cross target's executable suffix to every output
  #[arg(long)]
  cygwin: bool,

  /// Also build the LaTeX documentation after compiling
  #[arg(short = 'd', long, conflicts_with = "only_document")]
  document: bool,

  /// Only build the LaTeX documentation
  #[arg(short = 'D', long)]
  only_document: bool,

  /// Keep going after a failed step instead of stopping
  #[arg(short, long)]
  keep_going: bool,

  /// Print the commands without executing them
  #[arg(short = 'n', long)]
  dry_run: bool,

  /// List the build registry and exit
  #[arg(
    long,
    conflicts_with_all = ["sources", "flags", "suppress_flags", "cygwin", "document", "only_document", "keep_going", "dry_run"]
  )]
  list: bool,

  /// Output format for the summary
  #[arg(short = 'o', long, value_enum, default_value = "text")]
  output: OutputFormat,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn run_options(&self) -> RunOptions {
    let document = if self.only_document {
      DocumentMode::Only
    } else if self.document {
      DocumentMode::After
    } else {
      DocumentMode::Skip
    };

    RunOptions {
      sources: self.sources.clone(),
      flags: self.flags.clone(),
      suppress_flags: self.suppress_flags,
      cross_compile: self.cygwin,
      document,
      policy: if self.keep_going {
        FailurePolicy::Continue
      } else {
        FailurePolicy::FailFast
      },
    }
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match execute(&cli) {
    Ok(code) => code,
    Err(err) => {
      output::print_error(&format!("{err:#}"));
      if err.downcast_ref::<ConfigError>().is_some() {
        ExitCode::from(2)
      } else {
        ExitCode::FAILURE
      }
    }
  }
}

fn init_tracing(verbose: bool) {
  // Step failures are already reported by the CLI; library logs are opt-in.
  let default = if verbose {
    "wsbuild=debug,wsbuild_lib=debug"
  } else {
    "warn,wsbuild_lib=off"
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .without_time()
    .init();
}

fn execute(cli: &Cli) -> Result<ExitCode> {
  let config = BuildConfig::from_path(&cli.config)?;

  if cli.list {
    cmd::cmd_list(&config, cli.output)?;
    return Ok(ExitCode::SUCCESS);
  }

  let options = cli.run_options();
  debug!(?options, dry_run = cli.dry_run, "resolved run options");
  cmd::cmd_build(&config, &options, cli.dry_run, cli.output)
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn flags_map_onto_run_options() {
    let cli = Cli::parse_from([
      "wsbuild",
      "--sources",
      "question1.cpp",
      "question7.cpp",
      "--flags",
      "O3",
      "g",
      "--suppress-flags",
      "--cygwin",
      "--document",
      "--keep-going",
    ]);
    let options = cli.run_options();

    assert_eq!(
      options.sources,
      Some(vec!["question1.cpp".to_string(), "question7.cpp".to_string()])
    );
    assert_eq!(options.flags, ["O3", "g"]);
    assert!(options.suppress_flags);
    assert!(options.cross_compile);
    assert_eq!(options.document, DocumentMode::After);
    assert_eq!(options.policy, FailurePolicy::Continue);
  }

  #[test]
  fn defaults_map_onto_default_options() {
    let cli = Cli::parse_from(["wsbuild"]);
    assert_eq!(cli.run_options(), RunOptions::default());
    assert_eq!(cli.config, PathBuf::from("wsbuild.toml"));
  }

  #[test]
  fn only_document_selects_only_mode() {
    let cli = Cli::parse_from(["wsbuild", "-D"]);
    assert_eq!(cli.run_options().document, DocumentMode::Only);
  }

  #[test]
  fn document_and_only_document_conflict() {
    assert!(Cli::try_parse_from(["wsbuild", "--document", "--only-document"]).is_err());
  }

  #[test]
  fn flags_without_values_is_accepted() {
    let cli = Cli::parse_from(["wsbuild", "-f", "--suppress-flags"]);
    let options = cli.run_options();
    assert!(options.flags.is_empty());
    assert!(options.suppress_flags);
  }

  #[test]
  fn list_conflicts_with_run_options() {
    let cases: [&[&str]; 6] = [
      &["--sources", "zzz"],
      &["--flags", "O3"],
      &["--document"],
      &["--only-document"],
      &["--dry-run"],
      &["--cygwin"],
    ];
    for extra in cases {
      let args = ["wsbuild", "--list"].into_iter().chain(extra.iter().copied());
      assert!(Cli::try_parse_from(args).is_err(), "--list accepted with {extra:?}");
    }
  }

  #[test]
  fn empty_sources_list_is_rejected() {
    assert!(Cli::try_parse_from(["wsbuild", "--sources"]).is_err());
  }
}
