//! Error types for sigscout.
//!
//! Only startup problems surface as a `SigError`: an unknown algorithm
//! selector, a rule file that cannot be read or parsed, a missing root
//! directory, a bad configuration file. Failures while classifying a single
//! file never become a `SigError`; the classifier turns them into an
//! `Outcome::Unreadable` result so the rest of the batch keeps going.
//!
//! ```rust,ignore
//! match classify_directory(&config) {
//!     Ok(report) => // print one line per file,
//!     Err(SigError::MalformedRule { path, line, .. }) => // fix the rule file,
//!     Err(e) => // any other startup problem
//! }
//! ```
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sigscout operations
pub type SigResult<T> = Result<T, SigError>;

/// Errors that can abort a classification run before any file is processed
#[derive(Error, Debug)]
pub enum SigError {
    #[error("Unknown algorithm '{0}' (expected one of: naive, kmp, rabin-karp)")]
    UnknownAlgorithm(String),
    #[error("Unknown output format '{0}' (expected one of: text, json)")]
    UnknownFormat(String),
    #[error("Malformed rule at {}:{line}: {reason}", path.display())]
    MalformedRule {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("Failed to read rule file {}: {source}", path.display())]
    RuleFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<config::ConfigError> for SigError {
    fn from(err: config::ConfigError) -> Self {
        SigError::ConfigError(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for SigError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        SigError::ThreadPool(err.to_string())
    }
}

impl SigError {
    pub fn unknown_algorithm(name: impl Into<String>) -> Self {
        Self::UnknownAlgorithm(name.into())
    }

    pub fn unknown_format(name: impl Into<String>) -> Self {
        Self::UnknownFormat(name.into())
    }

    pub fn malformed_rule(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRule {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    pub fn rule_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RuleFile {
            path: path.into(),
            source,
        }
    }

    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DirectoryNotFound(path.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let err = SigError::unknown_algorithm("boyer-moore");
        assert!(matches!(err, SigError::UnknownAlgorithm(_)));

        let err = SigError::malformed_rule("patterns.db", 3, "expected 3 fields, found 2");
        assert!(matches!(err, SigError::MalformedRule { line: 3, .. }));

        let err = SigError::rule_file("patterns.db", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, SigError::RuleFile { .. }));

        let err = SigError::directory_not_found("missing");
        assert!(matches!(err, SigError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = SigError::unknown_algorithm("--BoyerMoore");
        assert_eq!(
            err.to_string(),
            "Unknown algorithm '--BoyerMoore' (expected one of: naive, kmp, rabin-karp)"
        );

        let err = SigError::malformed_rule("rules/patterns.db", 7, "empty pattern");
        assert_eq!(
            err.to_string(),
            "Malformed rule at rules/patterns.db:7: empty pattern"
        );

        let err = SigError::config_error("thread_count must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration error: thread_count must be positive"
        );

        let err = SigError::directory_not_found("files_for_check");
        assert_eq!(err.to_string(), "Directory not found: files_for_check");
    }

    #[test]
    fn test_rule_file_error_names_path() {
        let err = SigError::rule_file(
            "/tmp/patterns.db",
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/patterns.db"));
        assert!(message.contains("No such file or directory"));
    }
}
