//! JSON format converter.
//!
//! Converts JSON objects into field-value maps:
//! ```json
//! {
//!   "title": "Rust Programming",
//!   "year": 2024,
//!   "tags": ["systems", "safety"],
//!   "publisher": {"name": "No Starch"}
//! }
//! ```
//!
//! JSON has no timestamp, blob, reference or geo-point types, so those
//! values are written as RFC 3339 strings, byte arrays, path strings and
//! `{"latitude", "longitude"}` objects respectively. Reading JSON back only
//! yields the JSON-native types unless type inference is enabled.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

use crate::document::converter::MapConverter;
use crate::document::field_value::FieldValue;
use crate::document::map_field_value::MapFieldValue;
use crate::error::{FieldError, Result};

/// A map converter for JSON format.
#[derive(Debug, Clone, Default)]
pub struct JsonMapConverter {
    /// Interpret string values that look like booleans or timestamps.
    infer_types: bool,
    /// Pretty-print rendered JSON.
    pretty: bool,
}

impl JsonMapConverter {
    /// Create a new JSON converter that keeps strings as strings.
    pub fn new() -> Self {
        JsonMapConverter::default()
    }

    /// Create a JSON converter that infers booleans and timestamps from
    /// string values.
    pub fn with_type_inference() -> Self {
        JsonMapConverter {
            infer_types: true,
            pretty: false,
        }
    }

    /// Pretty-print rendered output.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Infer the field value type from a string.
    fn infer_field_value(&self, value: String) -> FieldValue {
        if !self.infer_types {
            return FieldValue::String(value);
        }

        if value.eq_ignore_ascii_case("true") {
            return FieldValue::Boolean(true);
        }
        if value.eq_ignore_ascii_case("false") {
            return FieldValue::Boolean(false);
        }

        if let Ok(timestamp) = DateTime::parse_from_rfc3339(&value) {
            return FieldValue::Timestamp(timestamp.with_timezone(&Utc));
        }

        FieldValue::String(value)
    }

    fn value_from_json(&self, value: Value) -> FieldValue {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => number_from_json(&n),
            Value::String(s) => self.infer_field_value(s),
            Value::Array(values) => FieldValue::Array(
                values
                    .into_iter()
                    .map(|v| self.value_from_json(v))
                    .collect(),
            ),
            Value::Object(object) => FieldValue::Map(self.map_from_object(object)),
        }
    }

    fn map_from_object(&self, object: Map<String, Value>) -> MapFieldValue {
        let mut map = MapFieldValue::with_capacity(object.len());
        for (key, value) in object {
            map.insert(key, self.value_from_json(value));
        }
        map
    }
}

fn number_from_json(n: &Number) -> FieldValue {
    if let Some(i) = n.as_i64() {
        return FieldValue::Integer(i);
    }
    if n.is_u64() {
        log::debug!("{n} does not fit in i64, storing it as a double");
    }
    match n.as_f64() {
        Some(f) => FieldValue::Double(f),
        None => FieldValue::String(n.to_string()),
    }
}

/// Convert a JSON value into a field value, keeping strings as strings.
pub fn field_value_from_json(value: Value) -> FieldValue {
    JsonMapConverter::new().value_from_json(value)
}

/// Convert a field value into JSON.
///
/// Fails for sentinels and non-finite doubles, which have no JSON form.
pub fn field_value_to_json(value: &FieldValue) -> Result<Value> {
    let json = match value {
        FieldValue::Null => Value::Null,
        FieldValue::Boolean(b) => Value::Bool(*b),
        FieldValue::Integer(i) => Value::Number((*i).into()),
        FieldValue::Double(d) => Number::from_f64(*d).map(Value::Number).ok_or_else(|| {
            FieldError::conversion(format!("{d} cannot be represented in JSON"))
        })?,
        FieldValue::Timestamp(t) => Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        FieldValue::String(s) => Value::String(s.clone()),
        FieldValue::Blob(bytes) => {
            Value::Array(bytes.iter().map(|b| Value::Number((*b).into())).collect())
        }
        FieldValue::Reference(path) => Value::String(path.clone()),
        FieldValue::GeoPoint(point) => serde_json::json!({
            "latitude": point.latitude(),
            "longitude": point.longitude(),
        }),
        FieldValue::Array(values) => Value::Array(
            values
                .iter()
                .map(field_value_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        FieldValue::Map(map) => Value::Object(map_to_object(map)?),
        sentinel => {
            return Err(FieldError::conversion(format!(
                "{:?} is a write-only sentinel and has no JSON form",
                sentinel.value_type()
            )));
        }
    };
    Ok(json)
}

fn map_to_object(map: &MapFieldValue) -> Result<Map<String, Value>> {
    let mut object = Map::new();
    for (key, value) in map {
        object.insert(key.clone(), field_value_to_json(value)?);
    }
    Ok(object)
}

/// Parse a JSON object into a string-keyed map.
pub fn map_from_json_str(input: &str) -> Result<MapFieldValue> {
    JsonMapConverter::new().convert(input)
}

/// Render a string-keyed map as a JSON value.
pub fn map_to_json(map: &MapFieldValue) -> Result<Value> {
    Ok(Value::Object(map_to_object(map)?))
}

impl MapConverter for JsonMapConverter {
    fn convert(&self, input: &str) -> Result<MapFieldValue> {
        let value: Value = serde_json::from_str(input)?;

        match value {
            Value::Object(object) => Ok(self.map_from_object(object)),
            other => Err(FieldError::conversion(format!(
                "expected a JSON object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    fn render(&self, map: &MapFieldValue) -> Result<String> {
        let value = map_to_json(map)?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(text)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
