//! Directory entry filtering.
//!
//! Ignore patterns use glob syntax. A pattern is tried against the entry's
//! file name and against its full path, so both `*.tmp` and
//! `**/scratch/*` work as expected.
use glob::Pattern;
use std::path::Path;
use tracing::warn;

/// Compiles ignore patterns, skipping (and logging) invalid ones
pub fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|pattern| match Pattern::new(pattern) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                warn!("Ignoring invalid ignore pattern '{}': {}", pattern, e);
                None
            }
        })
        .collect()
}

/// Checks if a directory entry should be left out of the run
pub fn should_ignore(path: &Path, ignore_patterns: &[Pattern]) -> bool {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let path_str = path.to_string_lossy();

    ignore_patterns
        .iter()
        .any(|pattern| pattern.matches(&file_name) || pattern.matches(&path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(raw: &[&str]) -> Vec<Pattern> {
        compile_patterns(&raw.iter().map(|p| p.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_should_ignore() {
        let ignore_patterns = patterns(&["*.tmp", ".git*", "**/cache/*"]);

        // Should ignore
        assert!(should_ignore(Path::new("files/data.tmp"), &ignore_patterns));
        assert!(should_ignore(Path::new("files/.gitignore"), &ignore_patterns));
        assert!(should_ignore(Path::new("root/cache/entry"), &ignore_patterns));

        // Should not ignore
        assert!(!should_ignore(Path::new("files/data.bin"), &ignore_patterns));
        assert!(!should_ignore(Path::new("files/tmp"), &ignore_patterns));
        assert!(!should_ignore(Path::new("files/git"), &ignore_patterns));
    }

    #[test]
    fn test_no_patterns_ignore_nothing() {
        assert!(!should_ignore(Path::new("anything"), &[]));
    }

    #[test]
    fn test_invalid_patterns_are_skipped() {
        let compiled = patterns(&["[unclosed", "*.log"]);
        assert_eq!(compiled.len(), 1);
        assert!(should_ignore(Path::new("run.log"), &compiled));
    }
}
