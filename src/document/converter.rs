//! Converters between field-value maps and external text formats.
//!
//! This module provides the [`MapConverter`] trait and its implementations,
//! which turn text input into [`MapFieldValue`]s and back.

use crate::document::map_field_value::MapFieldValue;
use crate::error::Result;

pub mod json;

/// A trait for converting text into field-value maps and back.
///
/// # Example
///
/// ```
/// use docfield::document::converter::MapConverter;
/// use docfield::document::converter::json::JsonMapConverter;
///
/// let converter = JsonMapConverter::new();
/// let map = converter.convert(r#"{"title": "Rust", "year": 2024}"#).unwrap();
/// assert_eq!(map.len(), 2);
/// ```
pub trait MapConverter {
    /// Parse text into a map.
    fn convert(&self, input: &str) -> Result<MapFieldValue>;

    /// Render a map as text.
    fn render(&self, map: &MapFieldValue) -> Result<String>;
}
