use ignore::WalkBuilder;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::classifier::Classifier;
use super::matcher::Algorithm;
use crate::config::{ReadMode, ScanConfig};
use crate::errors::{SigError, SigResult};
use crate::filters::{compile_patterns, should_ignore};
use crate::metrics::ScanMetrics;
use crate::results::{ClassificationReport, ClassificationResult};
use crate::rules::{load_rules, RuleSet};

/// Classifies every entry of `config.root_path` against the configured rules.
///
/// The rule file is loaded once and shared by all workers. Startup problems
/// (missing rule file, malformed rule, missing directory) are returned as
/// errors before any file is read; per-file failures end up in the report.
pub fn classify_directory(config: &ScanConfig) -> SigResult<ClassificationReport> {
    info!(
        "Classifying {} with {} ({:?} mode, {} threads)",
        config.root_path.display(),
        config.algorithm,
        config.read_mode,
        config.thread_count
    );

    let rules = Arc::new(load_rules(config.rules_path()?)?);
    let files = list_directory(&config.root_path, &config.ignore_patterns)?;

    classify_paths(
        &files,
        rules,
        config.algorithm,
        config.read_mode,
        config.thread_count,
    )
}

/// Lists the entries directly inside `root`, sorted by file name.
///
/// Subdirectories are listed too; classifying them yields an unreadable
/// result.
pub fn list_directory(root: &Path, ignore_patterns: &[String]) -> SigResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(SigError::directory_not_found(root));
    }

    let ignore_patterns = compile_patterns(ignore_patterns);

    let mut walker = WalkBuilder::new(root);
    walker
        .max_depth(Some(1))
        .standard_filters(false)
        .hidden(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let files: Vec<PathBuf> = walker
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.depth() == 1)
        .map(|entry| entry.into_path())
        .filter(|path| !should_ignore(path, &ignore_patterns))
        .collect();

    debug!("Found {} entries in {}", files.len(), root.display());
    Ok(files)
}

/// Classifies `paths` on a pool of `thread_count` workers.
///
/// The report holds exactly one result per path, in the order of `paths`,
/// whatever order the workers finish in.
pub fn classify_paths(
    paths: &[PathBuf],
    rules: Arc<RuleSet>,
    algorithm: Algorithm,
    read_mode: ReadMode,
    thread_count: NonZeroUsize,
) -> SigResult<ClassificationReport> {
    let metrics = ScanMetrics::new();
    let classifier = Classifier::with_metrics(rules, algorithm, read_mode, metrics.clone());

    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count.get())
        .thread_name(|index| format!("sigscout-worker-{}", index))
        .build()?;

    debug!(
        "Dispatching {} files to {} workers",
        paths.len(),
        pool.current_num_threads()
    );

    // An indexed collect writes each result into the slot of its path.
    let results: Vec<ClassificationResult> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| classify_task(&classifier, path))
            .collect()
    });
    drop(pool);

    metrics.log_stats();

    let report: ClassificationReport = results.into_iter().collect();
    info!(
        "Classification complete. {} files: {} matched, {} unknown, {} unreadable",
        report.files_classified, report.files_matched, report.files_unknown, report.files_unreadable
    );

    Ok(report)
}

/// Runs one task, turning a panic into an unreadable result for that file
fn classify_task(classifier: &Classifier, path: &Path) -> ClassificationResult {
    isolate_panic(path, classifier.metrics(), || classifier.classify(path))
}

fn isolate_panic<F>(path: &Path, metrics: &ScanMetrics, task: F) -> ClassificationResult
where
    F: FnOnce() -> ClassificationResult,
{
    panic::catch_unwind(AssertUnwindSafe(task)).unwrap_or_else(|payload| {
        let reason = panic_message(payload.as_ref());
        error!("Worker panicked on {}: {}", path.display(), reason);
        metrics.record_unreadable();
        ClassificationResult::unreadable(path, reason)
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
