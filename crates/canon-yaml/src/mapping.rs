//! Mappings that remember where they were parsed.

use indexmap::IndexMap;

use crate::{Context, OrderPolicy, Scalar, Value};

/// An insertion-ordered mapping plus the provenance of its node.
///
/// The context is fixed at construction. Equality compares the pairs only
/// and ignores their order, the same way two dictionaries compare.
#[derive(Debug, Clone)]
pub struct ContextMapping {
    entries: IndexMap<Scalar, Value>,
    context: Context,
}

impl ContextMapping {
    pub fn new(context: Context) -> Self {
        Self {
            entries: IndexMap::new(),
            context,
        }
    }

    /// Build from pairs in document order.
    ///
    /// A repeated key keeps its first position and takes the last value.
    pub fn from_pairs<I>(pairs: I, context: Context) -> Self
    where
        I: IntoIterator<Item = (Scalar, Value)>,
    {
        Self {
            entries: pairs.into_iter().collect(),
            context,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(&Scalar::String(key.to_string()))
    }

    pub fn get_scalar(&self, key: &Scalar) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<Scalar>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Scalar> {
        self.entries.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Scalar, Value> {
        self.entries.iter()
    }

    /// Pairs stably sorted by `policy`, as the dumper emits them.
    pub fn sorted_pairs(&self, policy: OrderPolicy) -> Vec<(&Scalar, &Value)> {
        let mut pairs: Vec<_> = self.entries.iter().collect();
        pairs.sort_by_cached_key(|(k, _)| policy.sort_key(&k.sort_text()));
        pairs
    }

    pub fn into_pairs(self) -> impl Iterator<Item = (Scalar, Value)> {
        self.entries.into_iter()
    }
}

impl PartialEq for ContextMapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<'a> IntoIterator for &'a ContextMapping {
    type Item = (&'a Scalar, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Scalar, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
