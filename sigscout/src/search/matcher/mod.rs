//! Exact substring matchers.
//!
//! Every matcher answers the same question: does `needle` occur as a
//! contiguous run of bytes inside `haystack`? Three algorithms are available
//! and are selected once per run through [`Algorithm`]:
//!
//! - [`Algorithm::Naive`]: tries every start position, O(n·m) worst case
//! - [`Algorithm::Kmp`]: Knuth–Morris–Pratt with a precomputed failure
//!   function, O(n + m)
//! - [`Algorithm::RabinKarp`]: polynomial rolling hash with a byte-by-byte
//!   confirmation on hash equality, O(n + m) expected
//!
//! For any input the three algorithms report the same answer. An empty
//! needle is contained in every haystack.
//!
//! Patterns are usually checked against many haystacks (one per line of a
//! file), so the per-pattern work is split out: [`Algorithm::compile`]
//! returns a [`Searcher`] that keeps the KMP failure table or the Rabin–Karp
//! pattern hash and can be reused for every haystack.
//!
//! ```
//! use sigscout::search::matcher::Algorithm;
//!
//! let searcher = Algorithm::Kmp.compile(b"PNG");
//! assert!(searcher.is_match(b"\x89PNG\r\n"));
//! assert!(!searcher.is_match(b"GIF89a"));
//! assert!(Algorithm::RabinKarp.contains(b"%PDF-1.7", b"PDF"));
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SigError;

pub mod kmp;
pub mod naive;
pub mod rabin_karp;

pub use kmp::Kmp;
pub use rabin_karp::RabinKarp;

/// Substring search algorithm used for every rule of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Naive,
    #[default]
    Kmp,
    #[serde(alias = "rabinkarp", alias = "rabin_karp")]
    RabinKarp,
}

impl Algorithm {
    /// All algorithms, in a fixed order
    pub const ALL: [Algorithm; 3] = [Algorithm::Naive, Algorithm::Kmp, Algorithm::RabinKarp];

    /// Canonical lowercase name, as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Naive => "naive",
            Algorithm::Kmp => "kmp",
            Algorithm::RabinKarp => "rabin-karp",
        }
    }

    /// Prepares `needle` for repeated searches with this algorithm
    pub fn compile<'p>(&self, needle: &'p [u8]) -> Searcher<'p> {
        match self {
            Algorithm::Naive => Searcher::Naive(needle),
            Algorithm::Kmp => Searcher::Kmp(Kmp::new(needle)),
            Algorithm::RabinKarp => Searcher::RabinKarp(RabinKarp::new(needle)),
        }
    }

    /// Returns true if `needle` occurs in `haystack`
    pub fn contains(&self, haystack: &[u8], needle: &[u8]) -> bool {
        self.compile(needle).is_match(haystack)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SigError;

    /// Accepts the canonical names case-insensitively, plus the legacy
    /// `--naive`, `--KMP` and `--RabinKarp` selector spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches("--").to_ascii_lowercase();
        match normalized.as_str() {
            "naive" => Ok(Algorithm::Naive),
            "kmp" => Ok(Algorithm::Kmp),
            "rabin-karp" | "rabinkarp" | "rabin_karp" => Ok(Algorithm::RabinKarp),
            _ => Err(SigError::unknown_algorithm(s)),
        }
    }
}

/// A needle prepared for one algorithm
#[derive(Debug, Clone)]
pub enum Searcher<'p> {
    Naive(&'p [u8]),
    Kmp(Kmp<'p>),
    RabinKarp(RabinKarp<'p>),
}

impl Searcher<'_> {
    /// Returns true if the compiled needle occurs in `haystack`
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        match self {
            Searcher::Naive(needle) => naive::contains(haystack, needle),
            Searcher::Kmp(kmp) => kmp.is_match(haystack),
            Searcher::RabinKarp(rk) => rk.is_match(haystack),
        }
    }

    /// The needle this searcher was compiled from
    pub fn needle(&self) -> &[u8] {
        match self {
            Searcher::Naive(needle) => needle,
            Searcher::Kmp(kmp) => kmp.pattern(),
            Searcher::RabinKarp(rk) => rk.pattern(),
        }
    }
}
