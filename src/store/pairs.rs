//! Key/Value Pair Set
//!
//! The unit of exchange between the cache engine and a store.

use std::collections::hash_map::{self, HashMap};

// == Pairs ==
/// Unordered mapping from string key to byte payload.
///
/// An empty payload is never held as a present entry: setting a key to an
/// empty value removes it, so absence always means "key omitted".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairs {
    inner: HashMap<String, Vec<u8>>,
}

impl Pairs {
    /// Creates an empty pair set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty pair set with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: HashMap::with_capacity(capacity),
        }
    }

    /// Sets `key` to `value`, replacing any previous payload.
    ///
    /// An empty `value` removes the key instead.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        let key = key.into();
        let value = value.into();
        if value.is_empty() {
            self.inner.remove(&key);
        } else {
            self.inner.insert(key, value);
        }
    }

    /// Returns the payload stored under `key`.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.inner.get(key).map(Vec::as_slice)
    }

    /// Removes and returns the payload stored under `key`.
    pub fn take(&mut self, key: &str) -> Option<Vec<u8>> {
        self.inner.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Iterates over payloads in unspecified order.
    pub fn values(&self) -> impl Iterator<Item = &[u8]> {
        self.inner.values().map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    // == Spread ==
    /// Flattens the set into an alternating `key, value, key, value, ...`
    /// argument list, the shape multi-set commands of network stores expect.
    ///
    /// Pair order is unspecified but each key is immediately followed by its
    /// own value.
    pub fn spread(&self) -> Vec<&[u8]> {
        let mut args = Vec::with_capacity(self.inner.len() * 2);
        for (key, value) in &self.inner {
            args.push(key.as_bytes());
            args.push(value.as_slice());
        }
        args
    }
}

impl IntoIterator for Pairs {
    type Item = (String, Vec<u8>);
    type IntoIter = hash_map::IntoIter<String, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Pairs
where
    K: Into<String>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut pairs = Pairs::new();
        for (key, value) in iter {
            pairs.set(key, value);
        }
        pairs
    }
}
