//! A dictionary that can hold multiple values per key.
//!
//! Submitted form data maps each key to a list of strings: a checkbox group
//! or a repeated input posts the same key more than once. Keys keep the
//! order in which they were first inserted.

use std::hash::Hash;

use indexmap::map;
use indexmap::IndexMap;

/// An insertion-ordered map from keys to lists of values.
///
/// [`get`](MultiValueDict::get) returns the **last** value for a key, while
/// [`get_list`](MultiValueDict::get_list) returns all of them.
///
/// # Examples
///
/// ```
/// use formskit_core::utils::MultiValueDict;
///
/// let mut d = MultiValueDict::new();
/// d.append("color".to_string(), "red");
/// d.append("color".to_string(), "blue");
///
/// assert_eq!(d.get(&"color".to_string()), Some(&"blue"));
/// assert_eq!(d.get_list(&"color".to_string()), Some(&vec!["red", "blue"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueDict<K: Eq + Hash, V> {
    inner: IndexMap<K, Vec<V>>,
}

impl<K: Eq + Hash, V> Default for MultiValueDict<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> MultiValueDict<K, V> {
    /// Creates an empty `MultiValueDict`.
    pub fn new() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }

    /// Returns the last value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key).and_then(|v| v.last())
    }

    /// Returns every value stored under `key`.
    pub fn get_list(&self, key: &K) -> Option<&Vec<V>> {
        self.inner.get(key)
    }

    /// Replaces the values of `key` with a single value.
    pub fn set(&mut self, key: K, value: V) {
        self.inner.insert(key, vec![value]);
    }

    /// Replaces the values of `key` with `values`.
    ///
    /// An empty list still registers the key.
    pub fn set_list(&mut self, key: K, values: Vec<V>) {
        self.inner.insert(key, values);
    }

    /// Appends a value to the list for the given key.
    pub fn append(&mut self, key: K, value: V) {
        self.inner.entry(key).or_default().push(value);
    }

    /// Removes a key and returns its values.
    pub fn remove(&mut self, key: &K) -> Option<Vec<V>> {
        self.inner.shift_remove(key)
    }

    /// Returns an iterator over the keys in insertion order.
    pub fn keys(&self) -> map::Keys<'_, K, Vec<V>> {
        self.inner.keys()
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the dictionary contains no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if the dictionary contains the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns an iterator over (key, value-list) pairs in insertion order.
    pub fn iter(&self) -> map::Iter<'_, K, Vec<V>> {
        self.inner.iter()
    }
}

impl<K: Eq + Hash, V> IntoIterator for MultiValueDict<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = map::IntoIter<K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, K: Eq + Hash, V> IntoIterator for &'a MultiValueDict<K, V> {
    type Item = (&'a K, &'a Vec<V>);
    type IntoIter = map::Iter<'a, K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let d: MultiValueDict<String, String> = MultiValueDict::new();
        assert!(d.is_empty());
        assert_eq!(d.len(), 0);
    }

    #[test]
    fn test_append_and_get_returns_last() {
        let mut d = MultiValueDict::new();
        d.append("name", "a");
        d.append("name", "b");

        assert_eq!(d.get(&"name"), Some(&"b"));
        assert_eq!(d.get_list(&"name"), Some(&vec!["a", "b"]));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_set_list_replaces_and_allows_empty() {
        let mut d = MultiValueDict::new();
        d.append("k", "a");
        d.set_list("k", vec!["x", "y"]);
        assert_eq!(d.get_list(&"k"), Some(&vec!["x", "y"]));

        d.set_list("empty", Vec::new());
        assert!(d.contains_key(&"empty"));
        assert_eq!(d.get(&"empty"), None);
    }

    #[test]
    fn test_set_replaces_existing() {
        let mut d = MultiValueDict::new();
        d.append("k", "a");
        d.append("k", "b");
        d.set("k", "c");
        assert_eq!(d.get_list(&"k"), Some(&vec!["c"]));
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut d = MultiValueDict::new();
        d.set("zeta", 1);
        d.set("alpha", 2);
        d.append("mid", 3);
        d.append("zeta", 4);

        let keys: Vec<_> = d.keys().copied().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_remove() {
        let mut d = MultiValueDict::new();
        d.set("a", 1);
        d.set("b", 2);
        assert_eq!(d.remove(&"a"), Some(vec![1]));
        assert!(!d.contains_key(&"a"));
        assert_eq!(d.remove(&"a"), None);
    }

    #[test]
    fn test_into_iter() {
        let mut d = MultiValueDict::new();
        d.append("a", 1);
        d.append("a", 2);
        d.append("b", 3);

        let items: Vec<_> = d.into_iter().collect();
        assert_eq!(items, vec![("a", vec![1, 2]), ("b", vec![3])]);
    }
}
