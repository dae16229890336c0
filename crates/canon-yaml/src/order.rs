//! Key ordering policies.
//!
//! The same comparator is used to validate documents on load and to
//! canonicalize mappings on dump.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::natural::{NaturalKey, natural_key};
use crate::{Error, Result};

/// How mapping keys must be (or will be) ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    /// No ordering requirement.
    None,

    /// Natural sort of the whole key: `host2` before `host12`.
    #[default]
    Natural,

    /// Natural sort of the dot-separated labels, read right to left.
    ///
    /// Names under the same parent domain group together:
    /// `a.test.com`, `sub2.a.test.com`, `sub10.a.test.com`, `b.test.com`.
    #[serde(rename = "dns")]
    DnsHierarchy,
}

/// Comparable projection of a key under a policy.
///
/// Holds one natural key per label. Natural ordering uses a single label
/// (the whole key).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey(Vec<NaturalKey>);

impl OrderPolicy {
    /// Whether loading with this policy checks key order at all.
    pub fn is_enforcing(self) -> bool {
        self != OrderPolicy::None
    }

    /// The policy dump uses: there is no unsorted dump, so `None` falls
    /// back to natural order.
    pub fn for_dump(self) -> OrderPolicy {
        match self {
            OrderPolicy::None => OrderPolicy::Natural,
            other => other,
        }
    }

    /// Project `key` into its sort key.
    pub fn sort_key(self, key: &str) -> SortKey {
        match self {
            OrderPolicy::None => SortKey(Vec::new()),
            OrderPolicy::Natural => SortKey(vec![natural_key(key)]),
            OrderPolicy::DnsHierarchy => SortKey(key.split('.').rev().map(natural_key).collect()),
        }
    }

    /// Compare two keys. `None` treats every pair as equal.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        self.sort_key(a).cmp(&self.sort_key(b))
    }

    /// Stable sort of `keys` by this policy.
    pub fn sorted<S: AsRef<str> + Clone>(self, keys: &[S]) -> Vec<S> {
        let mut sorted = keys.to_vec();
        sorted.sort_by_cached_key(|k| self.sort_key(k.as_ref()));
        sorted
    }

    /// Find the first position where `keys` departs from sorted order.
    ///
    /// Returns `(expected, actual)` at that position, or `None` when the
    /// keys are already sorted. Equal-ranking keys never mismatch.
    pub fn first_mismatch<S: AsRef<str> + Clone>(self, keys: &[S]) -> Option<(S, S)> {
        if !self.is_enforcing() {
            return None;
        }
        let expected = self.sorted(keys);
        keys.iter()
            .zip(expected)
            .find(|(actual, expected)| actual.as_ref() != expected.as_ref())
            .map(|(actual, expected)| (expected, actual.clone()))
    }
}

impl From<bool> for OrderPolicy {
    fn from(enforce: bool) -> Self {
        if enforce {
            OrderPolicy::Natural
        } else {
            OrderPolicy::None
        }
    }
}

impl FromStr for OrderPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dns" => Ok(OrderPolicy::DnsHierarchy),
            "true" | "natural" => Ok(OrderPolicy::Natural),
            "false" | "none" => Ok(OrderPolicy::None),
            other => Err(Error::InvalidPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for OrderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderPolicy::None => "none",
            OrderPolicy::Natural => "natural",
            OrderPolicy::DnsHierarchy => "dns",
        };
        f.write_str(name)
    }
}
