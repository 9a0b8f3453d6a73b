//! # Docfield
//!
//! Typed field values, field paths and field-value maps for document-database
//! clients.
//!
//! ## Features
//!
//! - Closed [`FieldValue`](document::FieldValue) type covering every document field type
//! - [`FieldPath`](document::FieldPath) parsing with canonical backtick quoting
//! - String-keyed and path-keyed field-value maps with order-independent equality
//! - Local application of set/merge/update writes, including sentinels
//! - JSON conversion

pub mod cli;
pub mod document;
pub mod error;

pub mod prelude {
    pub use crate::document::{
        DocumentSnapshot, FieldPath, FieldValue, FieldValueType, GeoPoint, MapFieldPathValue,
        MapFieldValue, SetOptions,
    };
    pub use crate::error::{FieldError, Result};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
