//! Ordered key-value mapping used as the external representation of an
//! object's state.
//!
//! [`FieldMap`] is what [`extract`](crate::meta::DtoMeta::extract) produces
//! and what [`hydrate`](crate::meta::DtoMeta::hydrate) consumes. Keys are
//! unique and iteration follows insertion order, so a map extracted from an
//! object replays its field declaration order.

use std::any::Any;
use std::fmt;

use crate::meta::FieldValue;

/// An insertion-ordered mapping from logical property names to type-erased
/// values.
///
/// Inserting an existing key replaces the value in place; the key keeps its
/// original position. This mirrors how repeated assignments to the same
/// logical name behave on the object itself.
///
/// # Example
///
/// ```
/// use fieldkit_core::FieldMap;
///
/// let mut map = FieldMap::new();
/// map.insert_value("id", 666_i64);
/// map.insert_value("username", "Spiderman".to_string());
///
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["id", "username"]);
/// assert_eq!(map.get_as::<i64>("id"), Some(&666));
/// ```
#[derive(Default)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create an empty map with space for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert a value under `key`, returning the previous value if the key
    /// was already present. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        let key = key.into();
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Convenience over [`insert`](Self::insert) that boxes a concrete value.
    pub fn insert_value<T: Any>(&mut self, key: impl Into<String>, value: T) -> Option<FieldValue> {
        self.insert(key, Box::new(value))
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Get the value stored under `key`, downcast to a concrete type.
    ///
    /// Returns `None` if the key is absent or the value has a different type.
    pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Remove and return the value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, FieldValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl Extend<(String, FieldValue)> for FieldMap {
    fn extend<I: IntoIterator<Item = (String, FieldValue)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl fmt::Debug for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are type-erased; only keys are printable.
        f.debug_struct("FieldMap")
            .field("len", &self.len())
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
