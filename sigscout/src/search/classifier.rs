use std::path::Path;
use std::sync::Arc;
use tracing::{trace, warn};

use super::matcher::{Algorithm, Searcher};
use super::processor::FileProcessor;
use crate::config::ReadMode;
use crate::metrics::ScanMetrics;
use crate::results::ClassificationResult;
use crate::rules::{Rule, RuleSet};

/// Splits content into lines ended by `\n`, `\r\n` or a lone `\r`
fn lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = Some(content);
    std::iter::from_fn(move || {
        let text = rest?;
        match text.iter().position(|&byte| byte == b'\n' || byte == b'\r') {
            Some(end) => {
                let terminator = if text[end..].starts_with(b"\r\n") { 2 } else { 1 };
                rest = Some(&text[end + terminator..]);
                Some(&text[..end])
            }
            None => {
                rest = None;
                Some(text)
            }
        }
    })
}

/// Applies an ordered rule set to single files.
///
/// When several rules match, the label of the last one in rule order wins.
/// Files that cannot be read produce an unreadable result instead of an
/// error.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Arc<RuleSet>,
    algorithm: Algorithm,
    read_mode: ReadMode,
    processor: FileProcessor,
}

impl Classifier {
    pub fn new(rules: Arc<RuleSet>, algorithm: Algorithm, read_mode: ReadMode) -> Self {
        Self::with_metrics(rules, algorithm, read_mode, ScanMetrics::new())
    }

    pub fn with_metrics(
        rules: Arc<RuleSet>,
        algorithm: Algorithm,
        read_mode: ReadMode,
        metrics: ScanMetrics,
    ) -> Self {
        Self {
            rules,
            algorithm,
            read_mode,
            processor: FileProcessor::new(metrics),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    pub fn metrics(&self) -> &ScanMetrics {
        self.processor.metrics()
    }

    /// Classifies the file at `path`
    pub fn classify(&self, path: &Path) -> ClassificationResult {
        trace!("Classifying file: {}", path.display());

        match self.processor.load(path) {
            Ok(content) => match self.matching_rule(&content) {
                Some(rule) => ClassificationResult::matched(path, rule.label.as_str()),
                None => ClassificationResult::unknown(path),
            },
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                self.metrics().record_unreadable();
                ClassificationResult::unreadable(path, e.to_string())
            }
        }
    }

    /// Returns the label for already loaded content, `None` if no rule matches
    pub fn classify_content(&self, content: &[u8]) -> Option<&str> {
        self.matching_rule(content).map(|rule| rule.label.as_str())
    }

    /// The last rule, in rule order, whose pattern occurs in `content`
    fn matching_rule(&self, content: &[u8]) -> Option<&Rule> {
        // Last match wins, so the first hit from the end decides.
        self.rules.iter().rev().find(|rule| {
            let searcher = self.algorithm.compile(rule.pattern.as_bytes());
            let found = self.occurs_in(&searcher, content);
            if found {
                trace!("Rule at line {} matched ({})", rule.line, rule.label);
            }
            found
        })
    }

    fn occurs_in(&self, searcher: &Searcher<'_>, content: &[u8]) -> bool {
        match self.read_mode {
            ReadMode::Lines => lines(content).any(|line| searcher.is_match(line)),
            ReadMode::WholeFile => searcher.is_match(content),
        }
    }
}
