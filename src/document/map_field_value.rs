//! Maps of field values.
//!
//! [`FieldValueMap`] is an unordered, unique-keyed association from a field
//! identifier to a [`FieldValue`]. Two key types are used throughout the
//! crate:
//!
//! - [`MapFieldValue`] is keyed by plain field names and is the shape of
//!   document data and of nested map values.
//! - [`MapFieldPathValue`] is keyed by [`FieldPath`] and describes updates
//!   that address nested fields directly.
//!
//! ```
//! use docfield::document::field_value::FieldValue;
//! use docfield::document::map_field_value::MapFieldValue;
//!
//! let mut data = MapFieldValue::new();
//! data.insert("name", "Ada");
//! data.insert("age", 30);
//! let previous = data.insert("age", 31);
//!
//! assert_eq!(previous, Some(FieldValue::Integer(30)));
//! assert_eq!(data.get("age"), Some(&FieldValue::Integer(31)));
//! assert_eq!(data.get("missing"), None);
//! assert_eq!(data.iter().count(), 2);
//! ```
//!
//! The map is a plain value with no interior synchronization. Share it
//! read-only, or guard it with a lock when several threads mutate it.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use ahash::RandomState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::field_path::FieldPath;
use crate::document::field_value::FieldValue;
use crate::document::geo_point::GeoPoint;
use crate::error::{FieldError, Result};

/// A map of field values indexed by field names.
pub type MapFieldValue = FieldValueMap<String>;

/// A map of field values indexed by field paths.
pub type MapFieldPathValue = FieldValueMap<FieldPath>;

/// An unordered map from field identifiers to owned field values.
///
/// Equality ignores insertion order: two maps are equal when they hold the
/// same set of keys with equal values.
#[derive(Clone, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(
        serialize = "K: Serialize",
        deserialize = "K: Deserialize<'de> + Eq + Hash"
    )
)]
pub struct FieldValueMap<K> {
    entries: HashMap<K, FieldValue, RandomState>,
}

impl<K: Eq + Hash> FieldValueMap<K> {
    /// Create an empty map.
    pub fn new() -> Self {
        FieldValueMap {
            entries: HashMap::default(),
        }
    }

    /// Create an empty map with room for at least `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        FieldValueMap {
            entries: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// Insert a value, returning the value previously stored under `key`.
    pub fn insert<Q, V>(&mut self, key: Q, value: V) -> Option<FieldValue>
    where
        Q: Into<K>,
        V: Into<FieldValue>,
    {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&FieldValue>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Look up the value stored under `key` for in-place modification.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut FieldValue>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_mut(key)
    }

    /// Check if the map has an entry for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Remove the entry for `key`, returning its value.
    ///
    /// Removing a key that is not present does nothing.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<FieldValue>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K> FieldValueMap<K> {
    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in unspecified order.
    ///
    /// The order is stable until the map is next mutated.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Iterate over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    /// Iterate over the values.
    pub fn values(&self) -> impl Iterator<Item = &FieldValue> + '_ {
        self.entries.values()
    }
}

impl<K: Eq + Hash + fmt::Display> FieldValueMap<K> {
    /// Build a map from pairs, rejecting any key that appears twice.
    ///
    /// Use `collect()` instead to keep the last value for repeated keys.
    pub fn try_from_pairs<I, Q, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Q, V)>,
        Q: Into<K>,
        V: Into<FieldValue>,
    {
        let pairs = pairs.into_iter();
        let mut map = Self::with_capacity(pairs.size_hint().0);
        for (key, value) in pairs {
            let key = key.into();
            if map.entries.contains_key(&key) {
                return Err(FieldError::duplicate_key(key.to_string()));
            }
            map.entries.insert(key, value.into());
        }
        Ok(map)
    }
}

impl<K: Eq + Hash> Default for FieldValueMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> PartialEq for FieldValueMap<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: fmt::Debug> fmt::Debug for FieldValueMap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K, Q, V> FromIterator<(Q, V)> for FieldValueMap<K>
where
    K: Eq + Hash + fmt::Debug,
    Q: Into<K>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (Q, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, Q, V> Extend<(Q, V)> for FieldValueMap<K>
where
    K: Eq + Hash + fmt::Debug,
    Q: Into<K>,
    V: Into<FieldValue>,
{
    fn extend<I: IntoIterator<Item = (Q, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let key = key.into();
            if self.entries.contains_key(&key) {
                log::debug!("overwriting repeated key {key:?}");
            }
            self.entries.insert(key, value.into());
        }
    }
}

/// Borrowing iterator over the entries of a [`FieldValueMap`].
pub struct Iter<'a, K> {
    inner: hash_map::Iter<'a, K, FieldValue>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = (&'a K, &'a FieldValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

/// Owning iterator over the entries of a [`FieldValueMap`].
pub struct IntoIter<K> {
    inner: hash_map::IntoIter<K, FieldValue>,
}

impl<K> Iterator for IntoIter<K> {
    type Item = (K, FieldValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}
impl<K> FusedIterator for IntoIter<K> {}

impl<K> IntoIterator for FieldValueMap<K> {
    type Item = (K, FieldValue);
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.entries.into_iter(),
        }
    }
}

impl<'a, K> IntoIterator for &'a FieldValueMap<K> {
    type Item = (&'a K, &'a FieldValue);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl MapFieldValue {
    /// Create a builder for constructing maps.
    pub fn builder() -> MapFieldValueBuilder {
        MapFieldValueBuilder::new()
    }

    /// Look up a nested value by walking through map values.
    ///
    /// Returns `None` if any segment is missing or an intermediate value is
    /// not a map.
    pub fn get_path(&self, path: &FieldPath) -> Option<&FieldValue> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.get(first.as_str())?;
        for segment in rest {
            current = current.as_map()?.get(segment.as_str())?;
        }
        Some(current)
    }

    /// Store a value at a nested path, returning the value it replaced.
    ///
    /// Missing intermediate maps are created. An intermediate value that is
    /// not a map is replaced by an empty map.
    pub fn set_path<V: Into<FieldValue>>(
        &mut self,
        path: &FieldPath,
        value: V,
    ) -> Option<FieldValue> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = self;
        for segment in parents {
            let entry = current
                .entries
                .entry(segment.clone())
                .or_insert_with(|| FieldValue::Map(MapFieldValue::new()));
            current = ensure_map(entry);
        }
        current.entries.insert(last.clone(), value.into())
    }

    /// Remove the value at a nested path, returning it.
    ///
    /// Missing paths are a no-op.
    pub fn remove_path(&mut self, path: &FieldPath) -> Option<FieldValue> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.get_mut(segment.as_str())?.as_map_mut()?;
        }
        current.remove(last.as_str())
    }

    /// Flatten nested maps into one entry per leaf path.
    ///
    /// Empty nested maps are kept as leaves so that `expand` restores them.
    /// Fails with [`FieldError::InvalidPath`] if any field name, at any
    /// depth, is empty, since no path can address it.
    pub fn flatten(&self) -> Result<MapFieldPathValue> {
        let mut flat = MapFieldPathValue::with_capacity(self.len());
        let mut prefix = Vec::new();
        flatten_into(self, &mut prefix, &mut flat)?;
        Ok(flat)
    }
}

fn ensure_map(value: &mut FieldValue) -> &mut MapFieldValue {
    if value.as_map().is_none() {
        *value = FieldValue::Map(MapFieldValue::new());
    }
    match value {
        FieldValue::Map(map) => map,
        _ => unreachable!("value was just replaced by a map"),
    }
}

fn flatten_into(
    map: &MapFieldValue,
    prefix: &mut Vec<String>,
    out: &mut MapFieldPathValue,
) -> Result<()> {
    for (key, value) in map {
        prefix.push(key.clone());
        match value {
            FieldValue::Map(nested) if !nested.is_empty() => flatten_into(nested, prefix, out)?,
            leaf => {
                let path = FieldPath::new(prefix.iter().cloned())?;
                out.entries.insert(path, leaf.clone());
            }
        }
        prefix.pop();
    }
    Ok(())
}

impl MapFieldPathValue {
    /// Build a path-keyed map from dotted path strings.
    ///
    /// Fails on a malformed path or when two strings name the same path.
    pub fn try_from_dotted<I, S, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<FieldValue>,
    {
        let parsed = pairs
            .into_iter()
            .map(|(path, value)| -> Result<(FieldPath, V)> {
                Ok((FieldPath::from_dot_separated(path.as_ref())?, value))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::try_from_pairs(parsed)
    }

    /// Paths in ascending segment order.
    pub fn sorted_paths(&self) -> Vec<&FieldPath> {
        let mut paths: Vec<&FieldPath> = self.keys().collect();
        paths.sort();
        paths
    }

    /// Check that no path is a prefix of another.
    pub fn validate_disjoint(&self) -> Result<()> {
        let paths = self.sorted_paths();
        // A prefix sorts directly before its nearest extension.
        for pair in paths.windows(2) {
            if pair[0].is_prefix_of(pair[1]) {
                return Err(FieldError::invalid_path(format!(
                    "field path {} conflicts with {}",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(())
    }

    /// Rebuild the nested map described by these paths.
    ///
    /// Fails if one path is a prefix of another, since both cannot be set.
    pub fn expand(&self) -> Result<MapFieldValue> {
        self.validate_disjoint()?;

        let mut nested = MapFieldValue::with_capacity(self.len());
        for (path, value) in self {
            nested.set_path(path, value.clone());
        }
        Ok(nested)
    }
}

/// A builder for constructing string-keyed maps in a fluent manner.
#[derive(Debug, Default)]
pub struct MapFieldValueBuilder {
    map: MapFieldValue,
}

impl MapFieldValueBuilder {
    /// Create a new map builder.
    pub fn new() -> Self {
        MapFieldValueBuilder {
            map: MapFieldValue::new(),
        }
    }

    /// Add a null field.
    pub fn add_null<S: Into<String>>(mut self, name: S) -> Self {
        self.map.insert(name, FieldValue::Null);
        self
    }

    /// Add a boolean field.
    pub fn add_boolean<S: Into<String>>(mut self, name: S, value: bool) -> Self {
        self.map.insert(name, FieldValue::Boolean(value));
        self
    }

    /// Add an integer field.
    pub fn add_integer<S: Into<String>>(mut self, name: S, value: i64) -> Self {
        self.map.insert(name, FieldValue::Integer(value));
        self
    }

    /// Add a double field.
    pub fn add_double<S: Into<String>>(mut self, name: S, value: f64) -> Self {
        self.map.insert(name, FieldValue::Double(value));
        self
    }

    /// Add a string field.
    pub fn add_string<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.map.insert(name, FieldValue::String(value.into()));
        self
    }

    /// Add a timestamp field.
    pub fn add_timestamp<S: Into<String>>(mut self, name: S, value: DateTime<Utc>) -> Self {
        self.map.insert(name, FieldValue::Timestamp(value));
        self
    }

    /// Add a blob field.
    pub fn add_blob<S: Into<String>>(mut self, name: S, value: Vec<u8>) -> Self {
        self.map.insert(name, FieldValue::Blob(value));
        self
    }

    /// Add a geo point field.
    pub fn add_geo_point<S: Into<String>>(mut self, name: S, value: GeoPoint) -> Self {
        self.map.insert(name, FieldValue::GeoPoint(value));
        self
    }

    /// Add an array field.
    pub fn add_array<S: Into<String>>(mut self, name: S, values: Vec<FieldValue>) -> Self {
        self.map.insert(name, FieldValue::Array(values));
        self
    }

    /// Add a nested map field.
    pub fn add_map<S: Into<String>>(mut self, name: S, value: MapFieldValue) -> Self {
        self.map.insert(name, FieldValue::Map(value));
        self
    }

    /// Add a field with any value, including sentinels.
    pub fn add_field<S: Into<String>>(mut self, name: S, value: FieldValue) -> Self {
        self.map.insert(name, value);
        self
    }

    /// Build the final map.
    pub fn build(self) -> MapFieldValue {
        self.map
    }
}
