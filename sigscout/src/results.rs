//! Classification results.
//!
//! Every input file produces exactly one [`ClassificationResult`], whatever
//! happens while reading it. A [`ClassificationReport`] keeps them in the
//! order the files were submitted, along with a few counters.
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::SigResult;

/// Label reported when no rule matched
pub const UNKNOWN_LABEL: &str = "Unknown file type";

/// Label reported when the file could not be read
pub const UNREADABLE_LABEL: &str = "no such file or directory";

/// What classifying one file produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// At least one rule matched; `label` is the last matching rule's label
    Matched { label: String },
    /// No rule matched
    Unknown,
    /// The file could not be opened or read
    Unreadable { reason: String },
}

impl Outcome {
    pub fn label(&self) -> &str {
        match self {
            Outcome::Matched { label } => label,
            Outcome::Unknown => UNKNOWN_LABEL,
            Outcome::Unreadable { .. } => UNREADABLE_LABEL,
        }
    }

    fn status(&self) -> &'static str {
        match self {
            Outcome::Matched { .. } => "matched",
            Outcome::Unknown => "unknown",
            Outcome::Unreadable { .. } => "unreadable",
        }
    }
}

/// The classification of a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// The path that was classified
    pub path: PathBuf,
    /// The final path component, as printed
    pub file_name: String,
    pub outcome: Outcome,
}

impl ClassificationResult {
    pub fn new(path: impl Into<PathBuf>, outcome: Outcome) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            file_name,
            outcome,
        }
    }

    pub fn matched(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self::new(
            path,
            Outcome::Matched {
                label: label.into(),
            },
        )
    }

    pub fn unknown(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Outcome::Unknown)
    }

    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::new(
            path,
            Outcome::Unreadable {
                reason: reason.into(),
            },
        )
    }

    /// The matched label, [`UNKNOWN_LABEL`] or [`UNREADABLE_LABEL`]
    pub fn label(&self) -> &str {
        self.outcome.label()
    }

    fn to_record(&self) -> ResultRecord<'_> {
        ResultRecord {
            file_name: &self.file_name,
            path: &self.path,
            label: self.label(),
            status: self.outcome.status(),
            reason: match &self.outcome {
                Outcome::Unreadable { reason } => Some(reason.as_str()),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.label())
    }
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    file_name: &'a str,
    path: &'a Path,
    label: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// All results of a run, in submission order
#[derive(Debug, Clone, Default)]
pub struct ClassificationReport {
    pub results: Vec<ClassificationResult>,
    pub files_classified: usize,
    pub files_matched: usize,
    pub files_unknown: usize,
    pub files_unreadable: usize,
}

impl ClassificationReport {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a result and updates the counters
    pub fn add_result(&mut self, result: ClassificationResult) {
        self.files_classified += 1;
        match result.outcome {
            Outcome::Matched { .. } => self.files_matched += 1,
            Outcome::Unknown => self.files_unknown += 1,
            Outcome::Unreadable { .. } => self.files_unreadable += 1,
        }
        self.results.push(result);
    }

    /// One `"<file>: <label>"` line per result
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.results.iter().map(ToString::to_string)
    }

    pub fn to_json(&self) -> SigResult<String> {
        let records: Vec<_> = self.results.iter().map(|r| r.to_record()).collect();
        let value = json!({
            "results": records,
            "files_classified": self.files_classified,
            "files_matched": self.files_matched,
            "files_unknown": self.files_unknown,
            "files_unreadable": self.files_unreadable,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

impl FromIterator<ClassificationResult> for ClassificationReport {
    fn from_iter<I: IntoIterator<Item = ClassificationResult>>(iter: I) -> Self {
        let mut report = Self::new();
        for result in iter {
            report.add_result(result);
        }
        report
    }
}
