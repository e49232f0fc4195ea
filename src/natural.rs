//! Natural ordering of file names.
//!
//! Names are split into maximal runs of ASCII digits and runs of everything
//! else. Digit runs compare by numeric value, so `file2` sorts before
//! `file10`; other runs compare case-insensitively. A name that starts with
//! a digit gets an empty leading text run, so it sorts before any name that
//! starts with a letter or punctuation.
//!
//! ```rust
//! use partzip::natural::sort_key;
//!
//! assert!(sort_key("file2") < sort_key("file10"));
//! assert!(sort_key("file10") < sort_key("file20a"));
//! assert!(sort_key("file10") < sort_key("filea"));
//! ```

use std::cmp::Ordering;

use crate::enumerate::FileEntry;

/// One run of a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortToken {
    /// A run of ASCII digits, stored as written.
    Number(String),
    /// Any other run, lower-cased.
    Text(String),
}

impl SortToken {
    fn as_str(&self) -> &str {
        match self {
            Self::Number(s) | Self::Text(s) => s,
        }
    }
}

/// Compares two digit runs by value without parsing, so runs longer than
/// any integer type still order correctly.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for SortToken {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => compare_digits(a, b),
            _ => self.as_str().cmp(other.as_str()),
        }
    }
}

impl PartialOrd for SortToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key of a name: its token sequence, compared lexicographically.
///
/// Equality follows the ordering, so `"a1"` and `"A01"` are equal keys.
#[derive(Debug, Clone)]
pub struct SortKey(Vec<SortToken>);

impl SortKey {
    /// Returns the tokens of the key.
    pub fn tokens(&self) -> &[SortToken] {
        &self.0
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Vec ordering is lexicographic over the token ordering and puts a
        // prefix before the longer key.
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

/// Builds the natural sort key of `name`.
pub fn sort_key(name: &str) -> SortKey {
    let mut tokens = Vec::new();
    let mut rest = name;

    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        tokens.push(SortToken::Text(String::new()));
    }

    while let Some(first) = rest.chars().next() {
        let digits = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        tokens.push(if digits {
            SortToken::Number(run.to_string())
        } else {
            SortToken::Text(run.to_lowercase())
        });
        rest = tail;
    }

    SortKey(tokens)
}

/// Compares two names in natural order.
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// Sorts entries by the natural key of their file stem.
///
/// The sort is stable: entries with equal keys keep their relative order.
pub fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by_cached_key(|entry| sort_key(&entry.stem()));
}
