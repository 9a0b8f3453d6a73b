//! Document snapshots and local application of document writes.
//!
//! Nothing here talks to a server. A [`DocumentSnapshot`] is decoded
//! document data as handed to a caller, and [`apply_set`] / [`apply_update`]
//! compute the data a document holds after a write, resolving sentinels the
//! way the server would at `commit_time`.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::document::field_path::FieldPath;
use crate::document::field_value::FieldValue;
use crate::document::map_field_value::{MapFieldPathValue, MapFieldValue};
use crate::error::{FieldError, Result};

const AUTO_ID_LENGTH: usize = 20;
const AUTO_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random 20-character alphanumeric document id.
pub fn auto_id() -> String {
    let mut rng = rand::rng();
    (0..AUTO_ID_LENGTH)
        .map(|_| AUTO_ID_ALPHABET[rng.random_range(0..AUTO_ID_ALPHABET.len())] as char)
        .collect()
}

/// The decoded contents of one document.
///
/// A snapshot of a document that does not exist has an id but no data.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DocumentSnapshot {
    id: String,
    data: Option<MapFieldValue>,
}

impl DocumentSnapshot {
    /// Create a snapshot of an existing document.
    pub fn new<S: Into<String>>(id: S, data: MapFieldValue) -> Self {
        DocumentSnapshot {
            id: id.into(),
            data: Some(data),
        }
    }

    /// Create a snapshot of an existing document with a generated id.
    pub fn with_auto_id(data: MapFieldValue) -> Self {
        Self::new(auto_id(), data)
    }

    /// Create a snapshot of a document that does not exist.
    pub fn missing<S: Into<String>>(id: S) -> Self {
        DocumentSnapshot {
            id: id.into(),
            data: None,
        }
    }

    /// The document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the document exists.
    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    /// All fields, or `None` if the document does not exist.
    pub fn data(&self) -> Option<&MapFieldValue> {
        self.data.as_ref()
    }

    /// Consume the snapshot, returning its fields.
    pub fn into_data(self) -> Option<MapFieldValue> {
        self.data
    }

    /// The value at `path`, or `None` if the document or field is missing.
    pub fn get(&self, path: &FieldPath) -> Option<&FieldValue> {
        self.data.as_ref()?.get_path(path)
    }

    /// The value at a dotted path such as `"address.city"`.
    pub fn get_str(&self, path: &str) -> Result<Option<&FieldValue>> {
        let path = FieldPath::from_dot_separated(path)?;
        Ok(self.get(&path))
    }
}

/// How [`apply_set`] combines new data with existing data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SetOptions {
    /// Replace the whole document.
    #[default]
    Overwrite,
    /// Write every leaf of the new data, keeping other fields.
    Merge,
    /// Write only the listed paths, keeping other fields.
    MergeFields(Vec<FieldPath>),
}

impl SetOptions {
    /// Merge only the given dotted paths.
    pub fn merge_fields<I, S>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = paths
            .into_iter()
            .map(|p| FieldPath::from_dot_separated(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(SetOptions::MergeFields(paths))
    }
}

/// Apply a set write to `target`.
///
/// `Delete` is only accepted when merging. `target` is left untouched if the
/// write is rejected.
pub fn apply_set(
    target: &mut MapFieldValue,
    data: &MapFieldValue,
    options: &SetOptions,
    commit_time: DateTime<Utc>,
) -> Result<()> {
    let mut result = match options {
        SetOptions::Overwrite => {
            if contains_delete(data) {
                return Err(FieldError::invalid_argument(
                    "Delete can only be used when merging or updating",
                ));
            }
            let mut result = MapFieldValue::with_capacity(data.len());
            for (key, value) in data {
                let path = FieldPath::new([key.as_str()])?;
                write_field(&mut result, &path, value, commit_time)?;
            }
            result
        }
        SetOptions::Merge => {
            let mut result = target.clone();
            let leaves = data.flatten()?;
            for path in leaves.sorted_paths() {
                if let Some(value) = leaves.get(path) {
                    write_leaf(&mut result, path, value, commit_time)?;
                }
            }
            result
        }
        SetOptions::MergeFields(paths) => {
            let mut result = target.clone();
            for path in paths {
                let value = data.get_path(path).ok_or_else(|| {
                    FieldError::invalid_argument(format!(
                        "field {path} is listed for merging but missing from the data"
                    ))
                })?;
                write_field(&mut result, path, value, commit_time)?;
            }
            result
        }
    };
    std::mem::swap(target, &mut result);
    Ok(())
}

/// Apply an update write to `target`.
///
/// Each path replaces the field it names; nested maps in the update replace
/// the whole subtree. Paths must not overlap, and `Delete` may only be the
/// value of a path, never sit inside a map value.
pub fn apply_update(
    target: &mut MapFieldValue,
    updates: &MapFieldPathValue,
    commit_time: DateTime<Utc>,
) -> Result<()> {
    updates.validate_disjoint()?;
    for (path, value) in updates {
        if let FieldValue::Map(nested) = value
            && contains_delete(nested)
        {
            return Err(FieldError::invalid_argument(format!(
                "field {path} has Delete inside a map value; name the nested path instead"
            )));
        }
    }

    let mut result = target.clone();
    for path in updates.sorted_paths() {
        if let Some(value) = updates.get(path) {
            write_field(&mut result, path, value, commit_time)?;
        }
    }
    std::mem::swap(target, &mut result);
    Ok(())
}

fn contains_delete(map: &MapFieldValue) -> bool {
    map.values().any(|value| match value {
        FieldValue::Delete => true,
        FieldValue::Map(nested) => contains_delete(nested),
        _ => false,
    })
}

/// Write `value` at `path`, replacing any subtree when `value` is a map.
fn write_field(
    target: &mut MapFieldValue,
    path: &FieldPath,
    value: &FieldValue,
    commit_time: DateTime<Utc>,
) -> Result<()> {
    let FieldValue::Map(nested) = value else {
        return write_leaf(target, path, value, commit_time);
    };

    target.set_path(path, FieldValue::Map(MapFieldValue::new()));
    for (sub_path, leaf) in nested.flatten()? {
        let full = FieldPath::new(path.segments().iter().chain(sub_path.segments()).cloned())?;
        write_leaf(target, &full, &leaf, commit_time)?;
    }
    Ok(())
}

fn write_leaf(
    target: &mut MapFieldValue,
    path: &FieldPath,
    value: &FieldValue,
    commit_time: DateTime<Utc>,
) -> Result<()> {
    let elements = match value {
        FieldValue::Array(values)
        | FieldValue::ArrayUnion(values)
        | FieldValue::ArrayRemove(values) => values.as_slice(),
        _ => &[],
    };
    if elements.iter().any(FieldValue::contains_sentinel) {
        return Err(FieldError::invalid_argument(format!(
            "field {path} has a sentinel inside an array"
        )));
    }

    match resolve_transform(target.get_path(path), value, commit_time) {
        Some(resolved) => {
            target.set_path(path, resolved);
        }
        None => {
            log::debug!("deleting field {path}");
            target.remove_path(path);
        }
    }
    Ok(())
}

/// The value stored after writing `value` over `current`; `None` deletes.
fn resolve_transform(
    current: Option<&FieldValue>,
    value: &FieldValue,
    commit_time: DateTime<Utc>,
) -> Option<FieldValue> {
    let resolved = match value {
        FieldValue::Delete => return None,
        FieldValue::ServerTimestamp => FieldValue::Timestamp(commit_time),
        FieldValue::ArrayUnion(elements) => {
            let mut array = current_array(current);
            for element in elements {
                if !array.contains(element) {
                    array.push(element.clone());
                }
            }
            FieldValue::Array(array)
        }
        FieldValue::ArrayRemove(elements) => {
            let mut array = current_array(current);
            array.retain(|v| !elements.contains(v));
            FieldValue::Array(array)
        }
        FieldValue::IncrementInteger(n) => match current {
            Some(FieldValue::Integer(i)) => FieldValue::Integer(i.saturating_add(*n)),
            Some(FieldValue::Double(d)) => FieldValue::Double(d + *n as f64),
            _ => FieldValue::Integer(*n),
        },
        FieldValue::IncrementDouble(x) => match current {
            Some(FieldValue::Integer(i)) => FieldValue::Double(*i as f64 + x),
            Some(FieldValue::Double(d)) => FieldValue::Double(d + x),
            _ => FieldValue::Double(*x),
        },
        plain => plain.clone(),
    };
    Some(resolved)
}

fn current_array(current: Option<&FieldValue>) -> Vec<FieldValue> {
    current
        .and_then(FieldValue::as_array)
        .map(<[FieldValue]>::to_vec)
        .unwrap_or_default()
}
