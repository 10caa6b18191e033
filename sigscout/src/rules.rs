//! Rule files.
//!
//! A rule file holds one rule per line:
//!
//! ```text
//! 1;"%PDF-";"PDF document"
//! 2;"pmview";"PCP pmview config"
//! 3;"PK";"Zip archive"
//! ```
//!
//! Fields are separated by `;`. The first field is an identifier and is not
//! used, the second is the pattern and the third the label reported when the
//! pattern is found. Trailing empty fields are dropped, so `1;"PK";"Zip";` is
//! accepted, and fields after the label are ignored. A quoted field loses its
//! surrounding `"` characters and any whitespace outside them; an unquoted
//! field is taken as is, spaces included. Blank lines are skipped. A line
//! with fewer than three fields, or an empty pattern or label, is rejected
//! with [`SigError::MalformedRule`].
//!
//! Rule order matters: when several rules match a file, the label of the
//! last matching rule wins.
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{SigError, SigResult};

const FIELD_SEPARATOR: char = ';';
const MIN_FIELD_COUNT: usize = 3;

/// A pattern and the label it implies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: String,
    pub label: String,
    /// 1-based line in the rule file, 0 for rules built in code
    pub line: usize,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: label.into(),
            line: 0,
        }
    }
}

/// Rules in load order
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    source: Option<PathBuf>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            source: None,
        }
    }

    /// The file these rules were loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn unquote(field: &str) -> &str {
    let trimmed = field.trim();
    if trimmed.starts_with('"') || trimmed.ends_with('"') {
        trimmed.trim_matches('"')
    } else {
        field
    }
}

fn parse_line(line: &str, number: usize, source: &Path) -> SigResult<Rule> {
    let mut fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    while matches!(fields.last(), Some(field) if field.is_empty()) {
        fields.pop();
    }
    if fields.len() < MIN_FIELD_COUNT {
        return Err(SigError::malformed_rule(
            source,
            number,
            format!(
                "expected at least {} '{}'-separated fields, found {}",
                MIN_FIELD_COUNT,
                FIELD_SEPARATOR,
                fields.len()
            ),
        ));
    }

    let pattern = unquote(fields[1]);
    if pattern.is_empty() {
        return Err(SigError::malformed_rule(source, number, "empty pattern"));
    }
    let label = unquote(fields[2]);
    if label.is_empty() {
        return Err(SigError::malformed_rule(source, number, "empty label"));
    }

    Ok(Rule {
        pattern: pattern.to_string(),
        label: label.to_string(),
        line: number,
    })
}

/// Parses rule file content; `source` is only used in error messages
pub fn parse_rules(content: &str, source: &Path) -> SigResult<RuleSet> {
    let rules = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(line, index + 1, source))
        .collect::<SigResult<Vec<_>>>()?;

    Ok(RuleSet {
        rules,
        source: Some(source.to_path_buf()),
    })
}

/// Reads and parses the rule file at `path`
pub fn load_rules(path: impl AsRef<Path>) -> SigResult<RuleSet> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| SigError::rule_file(path, e))?;
    let rules = parse_rules(&content, path)?;
    debug!("Loaded {} rules from {}", rules.len(), path.display());
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(content: &str) -> SigResult<RuleSet> {
        parse_rules(content, Path::new("patterns.db"))
    }

    #[test]
    fn test_parse_quoted_fields() {
        let rules = parse("AB49;\"PNG\";\"PNG image\"\n").unwrap();
        assert_eq!(rules.len(), 1);

        let rule = rules.iter().next().unwrap();
        assert_eq!(rule.pattern, "PNG");
        assert_eq!(rule.label, "PNG image");
        assert_eq!(rule.line, 1);
    }

    #[test]
    fn test_parse_preserves_order_and_line_numbers() {
        let content = "1;\"%PDF-\";\"PDF document\"\n\n2;\"PK\";\"Zip archive\"\r\n3;pmview;PCP pmview config\n";
        let rules = parse(content).unwrap();

        let parsed: Vec<_> = rules
            .iter()
            .map(|r| (r.pattern.as_str(), r.label.as_str(), r.line))
            .collect();
        assert_eq!(
            parsed,
            vec![
                ("%PDF-", "PDF document", 1),
                ("PK", "Zip archive", 3),
                ("pmview", "PCP pmview config", 4),
            ]
        );
    }

    #[test]
    fn test_quotes_keep_inner_spaces() {
        let rules = parse("7; \" MZ \" ; \"DOS executable\"").unwrap();
        let rule = rules.iter().next().unwrap();
        assert_eq!(rule.pattern, " MZ ");
        assert_eq!(rule.label, "DOS executable");
    }

    #[test]
    fn test_empty_content() {
        let rules = parse("").unwrap();
        assert!(rules.is_empty());

        let rules = parse("\n   \n").unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn test_too_few_fields() {
        let err = parse("1;\"PDF\";\"PDF document\"\n2;\"PK\"\n").unwrap_err();
        match err {
            SigError::MalformedRule { path, line, reason } => {
                assert_eq!(path, PathBuf::from("patterns.db"));
                assert_eq!(line, 2);
                assert!(reason.contains("found 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trailing_separator() {
        let rules = parse("AB49;\"PNG\";\"PNG image\";\n2;\"PK\";\"Zip archive\";;\n").unwrap();
        let parsed: Vec<_> = rules
            .iter()
            .map(|r| (r.pattern.as_str(), r.label.as_str()))
            .collect();
        assert_eq!(parsed, vec![("PNG", "PNG image"), ("PK", "Zip archive")]);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let rules = parse("1;\"PNG\";\"PNG image\";\"extra\";more").unwrap();
        let rule = rules.iter().next().unwrap();
        assert_eq!(rule.pattern, "PNG");
        assert_eq!(rule.label, "PNG image");
    }

    #[test]
    fn test_trailing_empty_fields_do_not_count() {
        let err = parse("1;\"PNG\";;").unwrap_err();
        assert!(matches!(err, SigError::MalformedRule { ref reason, .. } if reason.contains("found 2")));
    }

    #[test]
    fn test_unquoted_fields_keep_spaces() {
        let rules = parse("1; MZ ;DOS executable").unwrap();
        let rule = rules.iter().next().unwrap();
        assert_eq!(rule.pattern, " MZ ");
        assert_eq!(rule.label, "DOS executable");
    }

    #[test]
    fn test_empty_pattern_or_label() {
        let err = parse("1;\"\";\"Nothing\"").unwrap_err();
        assert!(matches!(err, SigError::MalformedRule { ref reason, .. } if reason == "empty pattern"));

        let err = parse("1;\"PNG\";\"\"").unwrap_err();
        assert!(matches!(err, SigError::MalformedRule { ref reason, .. } if reason == "empty label"));
    }

    #[test]
    fn test_load_rules_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patterns.db");
        std::fs::write(&path, "1;\"%PDF-\";\"PDF document\"\n2;\"PK\";\"Zip archive\"\n").unwrap();

        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.source(), Some(path.as_path()));
    }

    #[test]
    fn test_load_missing_rule_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.db");

        let err = load_rules(&path).unwrap_err();
        assert!(matches!(err, SigError::RuleFile { .. }));
        assert!(err.to_string().contains("missing.db"));
    }

    #[test]
    fn test_collect_into_rule_set() {
        let rules: RuleSet = vec![Rule::new("PNG", "PNG image"), Rule::new("GIF", "GIF image")]
            .into_iter()
            .collect();
        assert_eq!(rules.len(), 2);
        assert!(rules.source().is_none());
        assert_eq!((&rules).into_iter().last().unwrap().label, "GIF image");
    }
}
