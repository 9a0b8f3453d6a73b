//! Error types for the docfield library.
//!
//! All fallible operations return [`FieldError`] through the crate-wide
//! [`Result`] alias. A lookup miss is never an error; it is reported as
//! `None` by the map and snapshot accessors.
//!
//! # Examples
//!
//! ```
//! use docfield::error::{FieldError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FieldError::invalid_argument("latitude out of range"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for docfield operations.
#[derive(Error, Debug)]
pub enum FieldError {
    /// I/O errors (reading documents from files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed field path
    #[error("Invalid field path: {0}")]
    InvalidPath(String),

    /// Invalid argument (out-of-range coordinates, malformed references, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The same key was supplied twice to a strict constructor
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A value could not be converted to or from another representation
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with FieldError.
pub type Result<T> = std::result::Result<T, FieldError>;

impl FieldError {
    /// Create a new invalid path error.
    pub fn invalid_path<S: Into<String>>(msg: S) -> Self {
        FieldError::InvalidPath(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        FieldError::InvalidArgument(msg.into())
    }

    /// Create a new duplicate key error.
    pub fn duplicate_key<S: Into<String>>(key: S) -> Self {
        FieldError::DuplicateKey(key.into())
    }

    /// Create a new conversion error.
    pub fn conversion<S: Into<String>>(msg: S) -> Self {
        FieldError::Conversion(msg.into())
    }
}
