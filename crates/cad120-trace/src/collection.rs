use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::trace::WorldTrace;

/// World traces keyed by flattened video key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceCollection(BTreeMap<String, WorldTrace>);

impl TraceCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a trace, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, trace: WorldTrace) -> Option<WorldTrace> {
        self.0.insert(key.into(), trace)
    }

    /// Get the trace of one video by flattened key.
    pub fn get(&self, key: &str) -> Option<&WorldTrace> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Iterate `(key, trace)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &WorldTrace)> {
        self.0.iter()
    }

    /// Number of videos in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, WorldTrace)> for TraceCollection {
    fn from_iter<I: IntoIterator<Item = (String, WorldTrace)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for TraceCollection {
    type Item = (String, WorldTrace);
    type IntoIter = std::collections::btree_map::IntoIter<String, WorldTrace>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_keys_sorted() {
        let mut collection = TraceCollection::new();
        collection.insert("Subject3_b_2", WorldTrace::new("Subject3_b_2"));
        collection.insert("Subject1_a_1", WorldTrace::new("Subject1_a_1"));
        let keys: Vec<&String> = collection.keys().collect();
        assert_eq!(keys, vec!["Subject1_a_1", "Subject3_b_2"]);
        assert!(collection.contains_key("Subject1_a_1"));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_from_iterator() {
        let collection: TraceCollection = vec![("k_a_1".to_string(), WorldTrace::new("k_a_1"))]
            .into_iter()
            .collect();
        assert_eq!(collection.get("k_a_1").map(|t| t.description.as_str()), Some("k_a_1"));
    }
}
