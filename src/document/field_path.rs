//! Field paths addressing nested fields inside a document.
//!
//! A [`FieldPath`] is an immutable, non-empty sequence of segment names.
//! Paths compare and hash component-wise, so a path built from segments and
//! one parsed from a dotted string are interchangeable as map keys:
//!
//! ```
//! use docfield::document::field_path::FieldPath;
//!
//! let built = FieldPath::new(["a", "b"]).unwrap();
//! let parsed = FieldPath::from_dot_separated("a.b").unwrap();
//! assert_eq!(built, parsed);
//! assert_eq!(built.to_string(), "a.b");
//! ```
//!
//! Segments that are not simple identifiers are quoted with backticks in the
//! canonical form:
//!
//! ```
//! use docfield::document::field_path::FieldPath;
//!
//! let path = FieldPath::new(["users", "first.name"]).unwrap();
//! assert_eq!(path.canonical_string(), "users.`first.name`");
//! assert_eq!(FieldPath::parse_canonical("users.`first.name`").unwrap(), path);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{FieldError, Result};

/// Name of the reserved segment that addresses the document id.
pub const DOCUMENT_ID_SEGMENT: &str = "__name__";

/// Characters that may not appear in a dot-separated path.
const RESERVED_CHARS: &[char] = &['~', '*', '/', '[', ']'];

static SIMPLE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z_0-9]*$").expect("static segment regex"));

/// An ordered, non-empty sequence of segment names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Create a path from its segments.
    ///
    /// Fails if no segments are given or any segment is empty. Segments are
    /// taken literally, so they may contain dots or reserved characters.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(FieldError::invalid_path("a field path needs at least one segment"));
        }
        if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
            return Err(FieldError::invalid_path(format!(
                "segment {pos} of {segments:?} is empty"
            )));
        }
        Ok(FieldPath { segments })
    }

    /// Parse a user-supplied dotted path such as `"address.city"`.
    ///
    /// Dots always separate segments here; to address a field whose name
    /// contains a dot, build the path with [`FieldPath::new`].
    pub fn from_dot_separated(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(FieldError::invalid_path("field path must not be empty"));
        }
        if let Some(c) = path.chars().find(|c| RESERVED_CHARS.contains(c)) {
            return Err(FieldError::invalid_path(format!(
                "'{path}' contains the reserved character '{c}'"
            )));
        }
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(FieldError::invalid_path(format!(
                "'{path}' must not start or end with '.' or contain '..'"
            )));
        }
        Self::new(segments)
    }

    /// Parse the canonical form produced by [`FieldPath::canonical_string`].
    ///
    /// Backtick-quoted segments may contain dots; `\` escapes the next
    /// character.
    pub fn parse_canonical(path: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut chars = path.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => {
                        return Err(FieldError::invalid_path(format!(
                            "'{path}' ends with a trailing escape"
                        )));
                    }
                },
                '`' => quoted = !quoted,
                '.' if !quoted => {
                    if current.is_empty() {
                        return Err(FieldError::invalid_path(format!(
                            "'{path}' contains an empty segment"
                        )));
                    }
                    segments.push(std::mem::take(&mut current));
                }
                _ => current.push(c),
            }
        }

        if quoted {
            return Err(FieldError::invalid_path(format!("'{path}' has an unterminated backtick")));
        }
        if current.is_empty() {
            return Err(FieldError::invalid_path(format!("'{path}' contains an empty segment")));
        }
        segments.push(current);
        Self::new(segments)
    }

    /// The path that addresses the document id rather than a field.
    pub fn document_id() -> Self {
        FieldPath {
            segments: vec![DOCUMENT_ID_SEGMENT.to_string()],
        }
    }

    /// Whether this is the document id path.
    pub fn is_key_field_path(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == DOCUMENT_ID_SEGMENT
    }

    /// The segments of this path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments. Always at least one.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; present for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// First segment.
    pub fn first_segment(&self) -> &str {
        &self.segments[0]
    }

    /// Last segment.
    pub fn last_segment(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// The enclosing path, or `None` for a top-level field.
    pub fn parent(&self) -> Option<FieldPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(FieldPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// A new path with `segment` appended.
    pub fn child<S: Into<String>>(&self, segment: S) -> Result<FieldPath> {
        let segment = segment.into();
        if segment.is_empty() {
            return Err(FieldError::invalid_path("cannot append an empty segment"));
        }
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(FieldPath { segments })
    }

    /// Whether `self` equals `other` or addresses one of its ancestors.
    pub fn is_prefix_of(&self, other: &FieldPath) -> bool {
        self.segments.len() <= other.segments.len()
            && self.segments.iter().zip(&other.segments).all(|(a, b)| a == b)
    }

    /// Segments joined by `.`, quoting any segment that is not a simple
    /// identifier.
    pub fn canonical_string(&self) -> String {
        self.segments
            .iter()
            .map(|s| canonical_segment(s))
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn canonical_segment(segment: &str) -> String {
    if SIMPLE_SEGMENT.is_match(segment) {
        return segment.to_string();
    }
    let mut quoted = String::with_capacity(segment.len() + 2);
    quoted.push('`');
    for c in segment.chars() {
        if c == '\\' || c == '`' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('`');
    quoted
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

/// Parses the user-facing dotted form, as [`FieldPath::from_dot_separated`]
/// does. This is not the inverse of `Display` for paths with quoted
/// segments; read `Display` output back with [`FieldPath::parse_canonical`].
impl FromStr for FieldPath {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self> {
        FieldPath::from_dot_separated(s)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = FieldError;

    fn try_from(value: &str) -> Result<Self> {
        FieldPath::from_dot_separated(value)
    }
}

// Serialized as the canonical string so path-keyed maps stay valid JSON objects.
impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical_string())
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        FieldPath::parse_canonical(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_segments_and_dotted_paths_are_equal() {
        let built = FieldPath::new(["a", "b"]).unwrap();
        let parsed = FieldPath::from_dot_separated("a.b").unwrap();
        assert_eq!(built, parsed);

        let mut set = HashSet::new();
        set.insert(built);
        assert!(set.contains(&parsed));
    }

    #[test]
    fn test_invalid_paths() {
        assert!(FieldPath::new(Vec::<String>::new()).is_err());
        assert!(FieldPath::new(["a", ""]).is_err());
        assert!(FieldPath::from_dot_separated("").is_err());
        assert!(FieldPath::from_dot_separated(".a").is_err());
        assert!(FieldPath::from_dot_separated("a.").is_err());
        assert!(FieldPath::from_dot_separated("a..b").is_err());
        assert!(FieldPath::from_dot_separated("a/b").is_err());
        assert!(FieldPath::from_dot_separated("a[0]").is_err());
    }

    #[test]
    fn test_accessors() {
        let path = FieldPath::from_dot_separated("a.b.c").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.first_segment(), "a");
        assert_eq!(path.last_segment(), "c");
        assert_eq!(path.parent().unwrap().to_string(), "a.b");
        assert!(FieldPath::from_dot_separated("a").unwrap().parent().is_none());
        assert_eq!(path.child("d").unwrap().to_string(), "a.b.c.d");
    }

    #[test]
    fn test_prefix() {
        let parent = FieldPath::from_dot_separated("a.b").unwrap();
        let child = FieldPath::from_dot_separated("a.b.c").unwrap();
        let other = FieldPath::from_dot_separated("a.bc").unwrap();
        assert!(parent.is_prefix_of(&child));
        assert!(parent.is_prefix_of(&parent));
        assert!(!child.is_prefix_of(&parent));
        assert!(!parent.is_prefix_of(&other));
    }

    #[test]
    fn test_ordering_is_segment_wise() {
        let a = FieldPath::from_dot_separated("a.z").unwrap();
        let b = FieldPath::from_dot_separated("a.z.a").unwrap();
        let c = FieldPath::from_dot_separated("b").unwrap();
        let mut paths = vec![c.clone(), b.clone(), a.clone()];
        paths.sort();
        assert_eq!(paths, vec![a, b, c]);
    }

    #[test]
    fn test_canonical_quoting() {
        let path = FieldPath::new(["a", "b.c", "1x", "tick`", "back\\slash"]).unwrap();
        let canonical = path.canonical_string();
        assert_eq!(canonical, r"a.`b.c`.`1x`.`tick\``.`back\\slash`");
        assert_eq!(FieldPath::parse_canonical(&canonical).unwrap(), path);
    }

    #[test]
    fn test_display_reads_back_with_parse_canonical() {
        let simple = FieldPath::from_dot_separated("a.b").unwrap();
        assert_eq!(simple.to_string().parse::<FieldPath>().unwrap(), simple);

        let quoted = FieldPath::new(["a", "b.c"]).unwrap();
        let shown = quoted.to_string();
        assert_eq!(FieldPath::parse_canonical(&shown).unwrap(), quoted);
        // The dotted parser treats backticks literally and splits on every dot.
        assert_ne!(shown.parse::<FieldPath>().unwrap(), quoted);
    }

    #[test]
    fn test_parse_canonical_errors() {
        assert!(FieldPath::parse_canonical("a.`b").is_err());
        assert!(FieldPath::parse_canonical("a.").is_err());
        assert!(FieldPath::parse_canonical("a\\").is_err());
        assert!(FieldPath::parse_canonical("").is_err());
    }

    #[test]
    fn test_document_id() {
        let id = FieldPath::document_id();
        assert!(id.is_key_field_path());
        assert_eq!(id.to_string(), "__name__");
        assert!(!FieldPath::from_dot_separated("a.__name__").unwrap().is_key_field_path());
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let path = FieldPath::new(["meta", "content-type"]).unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#""meta.`content-type`""#);
        let back: FieldPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
