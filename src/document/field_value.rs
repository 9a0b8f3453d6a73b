//! Field value types for documents.
//!
//! This module defines the [`FieldValue`] enum which represents every type of
//! value a document field can hold, plus the write-only sentinels that
//! describe server-side transforms in a document mutation.
//!
//! # Supported Types
//!
//! - **Null** - Explicit null values
//! - **Boolean** - true/false values
//! - **Integer** - 64-bit signed integers
//! - **Double** - 64-bit floating-point numbers
//! - **Timestamp** - UTC timestamps
//! - **String** - UTF-8 text
//! - **Blob** - Raw byte data
//! - **Reference** - Path of another document
//! - **GeoPoint** - Geographic coordinates (latitude/longitude)
//! - **Array** - Ordered list of values
//! - **Map** - Nested string-keyed map
//!
//! # Type Conversion
//!
//! ```
//! use docfield::document::field_value::FieldValue;
//!
//! let text: FieldValue = "hello".into();
//! assert_eq!(text.as_string(), Some("hello"));
//!
//! let number = FieldValue::from(42);
//! assert_eq!(number.as_integer(), Some(42));
//! assert_eq!(number.as_double(), None);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::geo_point::GeoPoint;
use crate::document::map_field_value::MapFieldValue;
use crate::error::{FieldError, Result};

/// Discriminant of a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldValueType {
    Null,
    Boolean,
    Integer,
    Double,
    Timestamp,
    String,
    Blob,
    Reference,
    GeoPoint,
    Array,
    Map,
    Delete,
    ServerTimestamp,
    ArrayUnion,
    ArrayRemove,
    IncrementInteger,
    IncrementDouble,
}

/// Represents the value of a field in a document.
///
/// Values own all of their contents, so cloning a value (or a map holding
/// values) never shares state with the original.
///
/// The last six variants are sentinels. They are only meaningful inside a
/// write and never appear in snapshot data.
///
/// # Examples
///
/// ```
/// use docfield::document::field_value::FieldValue;
/// use docfield::document::map_field_value::MapFieldValue;
///
/// let mut address = MapFieldValue::new();
/// address.insert("city", FieldValue::from("London"));
///
/// let tags = FieldValue::Array(vec!["math".into(), "poetry".into()]);
/// let nested = FieldValue::Map(address);
/// assert!(nested.as_map().is_some());
/// assert_eq!(tags.as_array().map(|a| a.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Double(f64),
    /// Timestamp value
    Timestamp(DateTime<Utc>),
    /// String value
    String(String),
    /// Binary data
    Blob(Vec<u8>),
    /// Slash-separated document path, e.g. `users/ada`
    Reference(String),
    /// Geographic point value
    GeoPoint(GeoPoint),
    /// Ordered list of values
    Array(Vec<FieldValue>),
    /// Nested map
    Map(MapFieldValue),
    /// Removes the field when written
    Delete,
    /// Replaced by the commit time when written
    ServerTimestamp,
    /// Adds each element not already present to an array field
    ArrayUnion(Vec<FieldValue>),
    /// Removes every occurrence of each element from an array field
    ArrayRemove(Vec<FieldValue>),
    /// Adds to a numeric field
    IncrementInteger(i64),
    /// Adds to a numeric field
    IncrementDouble(f64),
}

impl FieldValue {
    /// Create a reference value, validating the document path.
    ///
    /// A document path has an even, non-zero number of non-empty segments
    /// (`collection/document[/collection/document...]`).
    pub fn reference<S: Into<String>>(path: S) -> Result<Self> {
        let path = path.into();
        let segments: Vec<&str> = path.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) || segments.len() % 2 != 0 {
            return Err(FieldError::invalid_argument(format!(
                "'{path}' is not a document path"
            )));
        }
        Ok(FieldValue::Reference(path))
    }

    /// The type of this value.
    pub fn value_type(&self) -> FieldValueType {
        match self {
            FieldValue::Null => FieldValueType::Null,
            FieldValue::Boolean(_) => FieldValueType::Boolean,
            FieldValue::Integer(_) => FieldValueType::Integer,
            FieldValue::Double(_) => FieldValueType::Double,
            FieldValue::Timestamp(_) => FieldValueType::Timestamp,
            FieldValue::String(_) => FieldValueType::String,
            FieldValue::Blob(_) => FieldValueType::Blob,
            FieldValue::Reference(_) => FieldValueType::Reference,
            FieldValue::GeoPoint(_) => FieldValueType::GeoPoint,
            FieldValue::Array(_) => FieldValueType::Array,
            FieldValue::Map(_) => FieldValueType::Map,
            FieldValue::Delete => FieldValueType::Delete,
            FieldValue::ServerTimestamp => FieldValueType::ServerTimestamp,
            FieldValue::ArrayUnion(_) => FieldValueType::ArrayUnion,
            FieldValue::ArrayRemove(_) => FieldValueType::ArrayRemove,
            FieldValue::IncrementInteger(_) => FieldValueType::IncrementInteger,
            FieldValue::IncrementDouble(_) => FieldValueType::IncrementDouble,
        }
    }

    /// Whether this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Whether this is a write-only sentinel.
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self,
            FieldValue::Delete
                | FieldValue::ServerTimestamp
                | FieldValue::ArrayUnion(_)
                | FieldValue::ArrayRemove(_)
                | FieldValue::IncrementInteger(_)
                | FieldValue::IncrementDouble(_)
        )
    }

    /// Get the value as a boolean, if it is one.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a double, if it is one.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            FieldValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Get the value as a timestamp, if it is one.
    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    /// Get the value as a string slice, if it is a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as binary data, if it is a blob.
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Blob(data) => Some(data),
            _ => None,
        }
    }

    /// Get the referenced document path, if this is a reference.
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            FieldValue::Reference(path) => Some(path),
            _ => None,
        }
    }

    /// Get the value as a geo point, if it is one.
    pub fn as_geo_point(&self) -> Option<&GeoPoint> {
        match self {
            FieldValue::GeoPoint(point) => Some(point),
            _ => None,
        }
    }

    /// Get the elements, if this is an array.
    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Get the nested map, if this is a map.
    pub fn as_map(&self) -> Option<&MapFieldValue> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get the nested map mutably, if this is a map.
    pub fn as_map_mut(&mut self) -> Option<&mut MapFieldValue> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Whether the value, or anything nested in it, is a sentinel.
    pub(crate) fn contains_sentinel(&self) -> bool {
        match self {
            FieldValue::Array(values) => values.iter().any(FieldValue::contains_sentinel),
            FieldValue::Map(map) => map.values().any(FieldValue::contains_sentinel),
            other => other.is_sentinel(),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Blob(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<GeoPoint> for FieldValue {
    fn from(value: GeoPoint) -> Self {
        FieldValue::GeoPoint(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::Array(value)
    }
}

impl From<MapFieldValue> for FieldValue {
    fn from(value: MapFieldValue) -> Self {
        FieldValue::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_accessors_match_variant() {
        assert_eq!(FieldValue::from(true).as_boolean(), Some(true));
        assert_eq!(FieldValue::from(7).as_integer(), Some(7));
        assert_eq!(FieldValue::from(1.5).as_double(), Some(1.5));
        assert_eq!(FieldValue::from("x").as_string(), Some("x"));
        assert_eq!(FieldValue::from(vec![1u8, 2]).as_blob(), Some(&[1u8, 2][..]));

        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(FieldValue::from(ts).as_timestamp(), Some(&ts));

        // No implicit coercion between types.
        assert_eq!(FieldValue::from(1).as_double(), None);
        assert_eq!(FieldValue::from("true").as_boolean(), None);
        assert_eq!(FieldValue::Null.as_string(), None);
    }

    #[test]
    fn test_value_type() {
        assert_eq!(FieldValue::Null.value_type(), FieldValueType::Null);
        assert_eq!(FieldValue::from(1).value_type(), FieldValueType::Integer);
        assert_eq!(
            FieldValue::Map(MapFieldValue::new()).value_type(),
            FieldValueType::Map
        );
        assert_eq!(
            FieldValue::IncrementDouble(1.0).value_type(),
            FieldValueType::IncrementDouble
        );
    }

    #[test]
    fn test_sentinels() {
        assert!(FieldValue::Delete.is_sentinel());
        assert!(FieldValue::ServerTimestamp.is_sentinel());
        assert!(FieldValue::ArrayUnion(vec![]).is_sentinel());
        assert!(!FieldValue::Array(vec![]).is_sentinel());

        let nested = FieldValue::Array(vec![FieldValue::from(1), FieldValue::Delete]);
        assert!(!nested.is_sentinel());
        assert!(nested.contains_sentinel());
    }

    #[test]
    fn test_reference_validation() {
        assert!(FieldValue::reference("users/ada").is_ok());
        assert!(FieldValue::reference("users/ada/posts/1").is_ok());
        assert!(FieldValue::reference("users").is_err());
        assert!(FieldValue::reference("users//ada").is_err());
        assert!(FieldValue::reference("users/ada/").is_err());
        assert_eq!(
            FieldValue::reference("users/ada").unwrap().as_reference(),
            Some("users/ada")
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mut inner = MapFieldValue::new();
        inner.insert("a", FieldValue::from(1));
        let original = FieldValue::Map(inner);

        let mut copy = original.clone();
        copy.as_map_mut()
            .unwrap()
            .insert("a", FieldValue::from(2));

        assert_eq!(
            original.as_map().unwrap().get("a"),
            Some(&FieldValue::from(1))
        );
        assert_ne!(original, copy);
    }
}
