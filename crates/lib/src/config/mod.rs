//! Build configuration.
//!
//! A configuration is loaded once from a TOML file and is immutable afterwards.
//! It carries the compiler, its default flags, the source and output
//! directories, the cross-compile target, the optional documentation settings
//! and the build registry.

pub mod registry;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::platform::Os;

pub use registry::{Entry, Registry};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILENAME: &str = "wsbuild.toml";

const DEFAULT_COMPILER: &str = "g++";
const DEFAULT_FLAGS: &[&str] = &["-Wall", "-O2", "-I/usr/include", "-lgsl", "-lgslcblas", "-lm"];
const DEFAULT_SOURCE_DIR: &str = "source";
const DEFAULT_OUTPUT_DIR: &str = "images";
const DEFAULT_DOCUMENT_DIR: &str = "documentation";
const DEFAULT_TYPESETTER: &str = "pdflatex";
const DEFAULT_BIBLIOGRAPHY: &str = "bibtex";

/// Errors detected before any process is spawned.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config {origin}: {source}")]
  Parse {
    origin: String,
    #[source]
    source: toml::de::Error,
  },

  #[error("compiler must not be empty")]
  EmptyCompiler,

  #[error("registry has no sources")]
  EmptyRegistry,

  #[error("source listed more than once in registry: {0}")]
  DuplicateEntry(String),

  #[error("source {0} has an empty output name")]
  EmptyOutput(String),

  #[error("documentation master document must not be empty")]
  EmptyMaster,

  #[error("unknown source: {0} (not in registry)")]
  UnknownSource(String),

  #[error("source requested more than once: {0}")]
  DuplicateSource(String),

  #[error("no sources selected")]
  EmptySelection,

  #[error("documentation requested but config has no [document] section")]
  DocumentationUnavailable,
}

/// Settings for the LaTeX documentation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
  /// Directory holding the master document, relative to the config root.
  pub dir: PathBuf,
  /// Master document file name, e.g. `worksheet2.tex`.
  pub master: String,
  pub typesetter: String,
  pub bibliography: String,
}

impl DocumentConfig {
  pub fn new(master: impl Into<String>) -> Self {
    Self {
      dir: PathBuf::from(DEFAULT_DOCUMENT_DIR),
      master: master.into(),
      typesetter: DEFAULT_TYPESETTER.to_string(),
      bibliography: DEFAULT_BIBLIOGRAPHY.to_string(),
    }
  }

  /// Master document name without its extension, as bibtex expects it.
  pub fn master_stem(&self) -> String {
    Path::new(&self.master)
      .file_stem()
      .map(|s| s.to_string_lossy().into_owned())
      .unwrap_or_else(|| self.master.clone())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
  /// Directory relative paths are resolved against and children run in.
  pub root: PathBuf,
  pub compiler: String,
  /// Flags passed to every compile unless suppressed, in order.
  pub flags: Vec<String>,
  pub source_dir: PathBuf,
  pub output_dir: PathBuf,
  /// Platform whose executable suffix `cross_compile` appends.
  pub cross_target: Os,
  pub document: Option<DocumentConfig>,
  pub registry: Registry,
}

impl BuildConfig {
  /// Configuration with the stock compiler settings for the given registry.
  pub fn new(registry: Registry) -> Self {
    Self {
      root: PathBuf::from("."),
      compiler: DEFAULT_COMPILER.to_string(),
      flags: DEFAULT_FLAGS.iter().map(|f| f.to_string()).collect(),
      source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
      output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
      cross_target: Os::default(),
      document: None,
      registry,
    }
  }

  /// Load and validate a configuration file. Relative paths inside it are
  /// resolved against the file's directory.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let root = match path.parent() {
      Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
      _ => PathBuf::from("."),
    };

    let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
      origin: path.display().to_string(),
      source,
    })?;

    let config = Self::from_file(file, root)?;
    debug!(
      path = %path.display(),
      root = %config.root.display(),
      compiler = %config.compiler,
      cross_target = %config.cross_target,
      sources = config.registry.len(),
      "loaded config"
    );
    Ok(config)
  }

  /// Parse a configuration from TOML text.
  pub fn from_toml_str(content: &str, root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
      origin: "<inline>".to_string(),
      source,
    })?;
    Self::from_file(file, root.into())
  }

  fn from_file(file: ConfigFile, root: PathBuf) -> Result<Self, ConfigError> {
    if file.compiler.trim().is_empty() {
      return Err(ConfigError::EmptyCompiler);
    }

    let document = match file.document {
      Some(doc) if doc.master.trim().is_empty() => return Err(ConfigError::EmptyMaster),
      Some(doc) => Some(DocumentConfig {
        dir: doc.dir,
        master: doc.master,
        typesetter: doc.typesetter,
        bibliography: doc.bibliography,
      }),
      None => None,
    };

    Ok(Self {
      root,
      compiler: file.compiler,
      flags: file.flags,
      source_dir: file.source_dir,
      output_dir: file.output_dir,
      cross_target: file.cross_target,
      document,
      registry: Registry::new(file.sources)?,
    })
  }

  pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.root = root.into();
    self
  }

  pub fn with_document(mut self, document: DocumentConfig) -> Self {
    self.document = Some(document);
    self
  }

  /// Directory the documentation passes run in, resolved against `root`.
  pub fn document_dir(&self) -> Option<PathBuf> {
    self.document.as_ref().map(|doc| self.root.join(&doc.dir))
  }
}

/// On-disk shape of the configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
  #[serde(default = "default_compiler")]
  compiler: String,
  #[serde(default = "default_flags")]
  flags: Vec<String>,
  #[serde(default = "default_source_dir")]
  source_dir: PathBuf,
  #[serde(default = "default_output_dir")]
  output_dir: PathBuf,
  #[serde(default)]
  cross_target: Os,
  #[serde(default)]
  document: Option<DocumentFile>,
  #[serde(default)]
  sources: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentFile {
  #[serde(default = "default_document_dir")]
  dir: PathBuf,
  master: String,
  #[serde(default = "default_typesetter")]
  typesetter: String,
  #[serde(default = "default_bibliography")]
  bibliography: String,
}

fn default_compiler() -> String {
  DEFAULT_COMPILER.to_string()
}

fn default_flags() -> Vec<String> {
  DEFAULT_FLAGS.iter().map(|f| f.to_string()).collect()
}

fn default_source_dir() -> PathBuf {
  PathBuf::from(DEFAULT_SOURCE_DIR)
}

fn default_output_dir() -> PathBuf {
  PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_document_dir() -> PathBuf {
  PathBuf::from(DEFAULT_DOCUMENT_DIR)
}

fn default_typesetter() -> String {
  DEFAULT_TYPESETTER.to_string()
}

fn default_bibliography() -> String {
  DEFAULT_BIBLIOGRAPHY.to_string()
}
