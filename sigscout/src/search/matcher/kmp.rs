//! Knuth–Morris–Pratt substring search.

/// Computes the failure function of `pattern`.
///
/// `table[i]` is the length of the longest proper prefix of `pattern[..=i]`
/// that is also a suffix of it.
pub fn prefix_function(pattern: &[u8]) -> Vec<usize> {
    let mut table = vec![0; pattern.len()];

    for i in 1..pattern.len() {
        let mut j = table[i - 1];
        while j > 0 && pattern[i] != pattern[j] {
            j = table[j - 1];
        }
        if pattern[i] == pattern[j] {
            j += 1;
        }
        table[i] = j;
    }

    table
}

/// A pattern with its precomputed failure function
#[derive(Debug, Clone)]
pub struct Kmp<'p> {
    pattern: &'p [u8],
    failure: Vec<usize>,
}

impl<'p> Kmp<'p> {
    pub fn new(pattern: &'p [u8]) -> Self {
        Self {
            pattern,
            failure: prefix_function(pattern),
        }
    }

    pub fn pattern(&self) -> &'p [u8] {
        self.pattern
    }

    /// Returns true if the pattern occurs in `text`
    pub fn is_match(&self, text: &[u8]) -> bool {
        if self.pattern.is_empty() {
            return true;
        }
        let mut found = false;
        self.scan(text, |_| {
            found = true;
            false
        });
        found
    }

    /// Start offsets of every occurrence of the pattern in `text`,
    /// overlapping occurrences included
    pub fn occurrences(&self, text: &[u8]) -> Vec<usize> {
        let mut starts = Vec::new();
        if self.pattern.is_empty() {
            return starts;
        }
        self.scan(text, |start| {
            starts.push(start);
            true
        });
        starts
    }

    /// Walks `text` once, calling `on_match` with the start of each
    /// occurrence until it returns false.
    fn scan(&self, text: &[u8], mut on_match: impl FnMut(usize) -> bool) {
        let m = self.pattern.len();
        if m > text.len() {
            return;
        }

        let mut j = 0;
        for (i, &byte) in text.iter().enumerate() {
            while j > 0 && byte != self.pattern[j] {
                j = self.failure[j - 1];
            }
            if byte == self.pattern[j] {
                j += 1;
            }
            if j == m {
                if !on_match(i + 1 - m) {
                    return;
                }
                j = self.failure[j - 1];
            }
        }
    }
}
