//! Rabin–Karp substring search with a polynomial rolling hash.
//!
//! The hash of a window `w` of length `m` is
//! `sum(value(w[i]) * BASE^i) mod MODULUS`. Each byte maps to `byte + 1`, so
//! every byte of the alphabet, NUL included, contributes to the hash. Equal
//! hashes are always confirmed byte by byte before a match is reported.
//!
//! Windows are visited from the tail of the haystack towards its head. Only
//! existence is reported, so the direction is not observable.

pub const BASE: u64 = 53;
pub const MODULUS: u64 = 1_000_000_009;

#[inline]
fn value(byte: u8) -> u64 {
    u64::from(byte) + 1
}

/// Polynomial hash of `bytes`, as used for the pattern and each window
pub fn polynomial_hash(bytes: &[u8]) -> u64 {
    let mut hash = 0;
    let mut pow = 1;
    for &byte in bytes {
        hash = (hash + value(byte) * pow) % MODULUS;
        pow = pow * BASE % MODULUS;
    }
    hash
}

/// A pattern with its precomputed hash
#[derive(Debug, Clone)]
pub struct RabinKarp<'p> {
    pattern: &'p [u8],
    pattern_hash: u64,
    /// `BASE^(m-1) mod MODULUS`, the weight of the last byte of a window
    high_pow: u64,
}

impl<'p> RabinKarp<'p> {
    pub fn new(pattern: &'p [u8]) -> Self {
        let high_pow = (1..pattern.len()).fold(1, |pow, _| pow * BASE % MODULUS);
        Self {
            pattern,
            pattern_hash: polynomial_hash(pattern),
            high_pow,
        }
    }

    pub fn pattern(&self) -> &'p [u8] {
        self.pattern
    }

    /// Returns true if the pattern occurs in `text`
    pub fn is_match(&self, text: &[u8]) -> bool {
        let m = self.pattern.len();
        if m == 0 {
            return true;
        }
        if m > text.len() {
            return false;
        }

        let mut start = text.len() - m;
        let mut window_hash = polynomial_hash(&text[start..]);

        loop {
            if window_hash == self.pattern_hash && self.confirm(&text[start..start + m]) {
                return true;
            }
            if start == 0 {
                return false;
            }

            // Drop the last byte of the window, shift every weight up by one
            // power, then add the byte in front of the window at weight 1.
            let outgoing = value(text[start + m - 1]) * self.high_pow % MODULUS;
            window_hash = (window_hash + MODULUS - outgoing) % MODULUS * BASE % MODULUS;
            window_hash = (window_hash + value(text[start - 1])) % MODULUS;
            start -= 1;
        }
    }

    fn confirm(&self, window: &[u8]) -> bool {
        window
            .iter()
            .zip(self.pattern)
            .all(|(actual, expected)| actual == expected)
    }
}
