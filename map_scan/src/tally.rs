use std::collections::btree_map;
use std::collections::BTreeMap;

/// Reference counts keyed by material name or resource path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    counts: BTreeMap<String, u32>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: impl Into<String>) {
        *self.counts.entry(key.into()).or_insert(0) += 1;
    }

    pub fn insert(&mut self, key: impl Into<String>, count: u32) {
        self.counts.insert(key.into(), count);
    }

    /// Copies every entry of `source` into `self`, replacing counts of
    /// keys that already exist instead of summing them.
    pub fn overwrite_from(&mut self, source: &Tally) {
        for (key, count) in &source.counts {
            self.counts.insert(key.clone(), *count);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<u32> {
        self.counts.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.counts.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(key, count)| (key.as_str(), *count))
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for Tally {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for (key, count) in iter {
            tally.insert(key, count);
        }
        tally
    }
}

impl IntoIterator for Tally {
    type Item = (String, u32);
    type IntoIter = btree_map::IntoIter<String, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}
