//! Natural sort keys.
//!
//! A key splits a string into alternating text and digit runs. Digit runs
//! compare by numeric magnitude, so `item2` sorts before `item12`. Text runs
//! compare by code point, case-sensitively.
//!
//! Every key starts with a text chunk (empty when the string starts with a
//! digit), so chunks at the same position always have the same kind.
//!
//! Only ASCII `0`-`9` form digit runs. Other Unicode decimal digits (`٣`,
//! `３`) are text and compare by code point.

use std::cmp::Ordering;

/// Comparable projection of a string for natural ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Chunk>);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    Text(String),
    Number(Digits),
}

/// A run of ASCII digits with leading zeros removed.
///
/// Ordered by magnitude without parsing, so runs of any length compare
/// correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        Digits(run.trim_start_matches('0').to_string())
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the natural sort key of `s`.
///
/// ```rust
/// use canon_yaml::natural_key;
///
/// assert!(natural_key("item2") < natural_key("item12"));
/// assert_eq!(natural_key("item02"), natural_key("item2"));
/// ```
pub fn natural_key(s: &str) -> NaturalKey {
    let mut chunks = Vec::new();
    let mut rest = s;

    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits > 0 {
            if chunks.is_empty() {
                chunks.push(Chunk::Text(String::new()));
            }
            let (run, tail) = rest.split_at(digits);
            chunks.push(Chunk::Number(Digits::new(run)));
            rest = tail;
        } else {
            let text = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
            let (run, tail) = rest.split_at(text);
            chunks.push(Chunk::Text(run.to_string()));
            rest = tail;
        }
    }

    NaturalKey(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(items: &[&str]) -> Vec<String> {
        let mut items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        items.sort_by_cached_key(|s| natural_key(s));
        items
    }

    #[test]
    fn test_numeric_runs_compare_by_value() {
        assert!(natural_key("2") < natural_key("12"));
        assert!(natural_key("item2") < natural_key("item12"));
        assert!(natural_key("sub9") < natural_key("sub10"));
    }

    #[test]
    fn test_zero_padding_ties() {
        assert_eq!(natural_key("item002"), natural_key("item2"));
        assert!(natural_key("item002") < natural_key("item12"));
        assert_eq!(natural_key("0"), natural_key("000"));
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert!(natural_key("") < natural_key("a"));
        assert!(natural_key("a") < natural_key("a1"));
        assert!(natural_key("www") < natural_key("www2"));
    }

    #[test]
    fn test_leading_digits() {
        assert!(natural_key("9a") < natural_key("10"));
        assert!(natural_key("2foo") < natural_key("foo"));
    }

    #[test]
    fn test_case_sensitive_text() {
        assert!(natural_key("B") < natural_key("a"));
        assert!(natural_key("a") < natural_key("b"));
    }

    #[test]
    fn test_long_digit_runs() {
        let small = "host99999999999999999999999999";
        let large = "host100000000000000000000000000";
        assert!(natural_key(small) < natural_key(large));
    }

    #[test]
    fn test_non_ascii_digits_are_text() {
        // Fullwidth digits do not form a number chunk, so no magnitude compare.
        assert_eq!(natural_key("x\u{FF12}"), NaturalKey(vec![Chunk::Text("x\u{FF12}".into())]));
        assert!(natural_key("x\u{FF12}") > natural_key("x10"));
    }

    #[test]
    fn test_sort_mixed() {
        assert_eq!(
            sorted(&["x10", "x1", "x2", "", "x", "x1a", "w20"]),
            vec!["", "w20", "x", "x1", "x1a", "x2", "x10"]
        );
    }

    #[test]
    fn test_non_ascii_text() {
        assert!(natural_key("é1") < natural_key("é2"));
        assert!(natural_key("z") < natural_key("é"));
    }
}
