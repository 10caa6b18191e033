//! Configuration for a classification run.
//!
//! # Configuration Locations
//!
//! Configuration is merged from these locations, later ones winning:
//! 1. Global `$CONFIG_DIR/sigscout/config.yaml`
//! 2. Local `.sigscout.yaml` in the current directory
//! 3. Custom config file given with `--config`
//!
//! Command line arguments override every file value (see
//! [`ScanConfig::merge_with_cli`]).
//!
//! # Configuration Format
//!
//! ```yaml
//! # Directory whose entries are classified
//! root_path: "files_for_check"
//!
//! # Rule file, one `id;"pattern";"label"` rule per line
//! rules_path: "patterns.db"
//!
//! # naive | kmp | rabin-karp
//! algorithm: "kmp"
//!
//! # Size of the worker pool
//! thread_count: 10
//!
//! # lines (patterns never span a line break) | whole_file
//! read_mode: "lines"
//!
//! # Directory entries to skip (glob syntax)
//! ignore_patterns:
//!   - "*.tmp"
//!
//! # Log level (trace, debug, info, warn, error)
//! log_level: "warn"
//! ```
use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::path::{Path, PathBuf};

use crate::errors::{SigError, SigResult};
use crate::search::matcher::Algorithm;

/// Worker pool size used when none is configured
pub const DEFAULT_THREAD_COUNT: usize = 10;

/// Granularity at which file content is handed to the matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    /// Each line is searched on its own; a pattern spanning a line break is
    /// not found. Lines end at `\n`, `\r\n` or a lone `\r`.
    #[default]
    Lines,
    /// The whole file is searched as one haystack
    WholeFile,
}

impl FromStr for ReadMode {
    type Err = SigError;

    fn from_str(s: &str) -> SigResult<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "lines" => Ok(ReadMode::Lines),
            "whole_file" => Ok(ReadMode::WholeFile),
            _ => Err(SigError::config_error(format!(
                "unknown read mode '{}' (expected lines or whole-file)",
                s
            ))),
        }
    }
}

/// Configuration for a classification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory whose entries are classified (not recursive)
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Rule file to load
    #[serde(default)]
    pub rules_path: Option<PathBuf>,

    /// Substring search algorithm
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Number of worker threads
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Read granularity for the matcher
    #[serde(default)]
    pub read_mode: ReadMode,

    /// Directory entries to skip (glob syntax, matched against the file name
    /// and the full path)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_THREAD_COUNT).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            rules_path: None,
            algorithm: Algorithm::default(),
            thread_count: default_thread_count(),
            read_mode: ReadMode::default(),
            ignore_patterns: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

/// Values given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
    pub algorithm: Option<Algorithm>,
    pub thread_count: Option<NonZeroUsize>,
    pub read_mode: Option<ReadMode>,
    pub ignore_patterns: Vec<String>,
    pub log_level: Option<String>,
}

impl ScanConfig {
    /// Creates a configuration for classifying `root_path` with `rules_path`
    pub fn new(root_path: impl Into<PathBuf>, rules_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            rules_path: Some(rules_path.into()),
            ..Default::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_thread_count(mut self, count: NonZeroUsize) -> Self {
        self.thread_count = count;
        self
    }

    pub fn with_read_mode(mut self, read_mode: ReadMode) -> Self {
        self.read_mode = read_mode;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Loads configuration from the default locations
    pub fn load() -> SigResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus `config_path`.
    ///
    /// An explicit `config_path` must exist; the default locations are
    /// skipped when absent.
    pub fn load_from(config_path: Option<&Path>) -> SigResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let default_files = [
            dirs::config_dir().map(|p| p.join("sigscout/config.yaml")),
            Some(PathBuf::from(".sigscout.yaml")),
        ];

        for path in default_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(SigError::config_error(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Applies command line values on top of file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(root_path) = cli.root_path {
            self.root_path = root_path;
        }
        if let Some(rules_path) = cli.rules_path {
            self.rules_path = Some(rules_path);
        }
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(read_mode) = cli.read_mode {
            self.read_mode = read_mode;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns = cli.ignore_patterns;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }

    /// The configured rule file, or a configuration error if none is set
    pub fn rules_path(&self) -> SigResult<&Path> {
        self.rules_path
            .as_deref()
            .ok_or_else(|| SigError::config_error("no rule file configured"))
    }
}
