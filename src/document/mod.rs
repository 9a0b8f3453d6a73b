//! Document field values, field paths and field-value maps.
//!
//! This module provides the value types a document is made of and the two
//! maps used to read and write documents: [`MapFieldValue`] keyed by field
//! name and [`MapFieldPathValue`] keyed by [`FieldPath`].

pub mod converter;
#[allow(clippy::module_inception)]
pub mod document;
pub mod field_path;
pub mod field_value;
pub mod geo_point;
pub mod map_field_value;

// Re-export commonly used types
pub use document::{DocumentSnapshot, SetOptions, apply_set, apply_update, auto_id};
pub use field_path::FieldPath;
pub use field_value::{FieldValue, FieldValueType};
pub use geo_point::GeoPoint;
pub use map_field_value::{FieldValueMap, MapFieldPathValue, MapFieldValue, MapFieldValueBuilder};
