//! Error types for CSV encoding and decoding.
//!
//! Every failure in the codec is terminal for the record or row being
//! processed; batch operations stop at the first failing row and return no
//! partial table.
//!
//! ## Error Categories
//!
//! - **Structural ambiguity**: duplicate flattened keys during encode,
//!   duplicate column names in an inferred header
//! - **Missing data**: a required path key absent from the header, or a row
//!   shorter than the header
//! - **Type mismatches**: cell text that does not parse as the target leaf
//! - **Invalid numeric formatting**: the configured [`NumberFormat`] declined
//!   to render a value
//!
//! [`NumberFormat`]: crate::NumberFormat
//!
//! ## Examples
//!
//! ```rust
//! use serde_flatcsv::{from_str, Csv, Error};
//!
//! #[derive(serde::Deserialize)]
//! struct Point { x: i64, y: i64 }
//!
//! let result: Result<Csv<Point>, Error> = from_str("x,z\n1,2");
//! assert!(matches!(result, Err(Error::KeyNotFound { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during CSV encoding/decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Two leaves of one record flattened to the same key
    #[error("value already stored under key `{key}`")]
    DuplicateKey { key: String },

    /// Two columns of an inferred header carry the same text
    #[error("header columns {first} and {second} share the text `{text}`")]
    DuplicateColumn {
        first: usize,
        second: usize,
        text: String,
    },

    /// A required path key is absent from the header
    #[error("key `{key}` not found")]
    KeyNotFound { key: String },

    /// The header maps a key past the end of the row
    #[error("column {index} out of bounds for row of {len} cells")]
    ColumnOutOfBounds { index: usize, len: usize },

    /// Cell text failed to parse as the target leaf kind
    #[error("`{value}` is not a valid {expected}")]
    TypeMismatch { value: String, expected: String },

    /// The configured number format declined to render a value
    #[error("`{value}` cannot be formatted by {formatter}")]
    InvalidNumber { value: String, formatter: String },

    /// Decode called on text with no lines at all
    #[error("empty input")]
    EmptyInput,

    /// A container shape the flat format cannot represent
    #[error("unsupported shape: {0}")]
    UnsupportedShape(String),

    /// Custom error raised through serde
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a duplicate-key error for a flattened key that was already
    /// populated during the current record's traversal.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Error::DuplicateKey { key: key.into() }
    }

    /// Creates a missing-key error naming the joined path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_flatcsv::Error;
    ///
    /// let err = Error::key_not_found("foo bar");
    /// assert!(err.to_string().contains("foo bar"));
    /// ```
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Error::KeyNotFound { key: key.into() }
    }

    /// Creates a type-mismatch error carrying the offending cell text and the
    /// name of the expected leaf kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_flatcsv::Error;
    ///
    /// let err = Error::type_mismatch("maybe", "bool");
    /// assert!(err.to_string().contains("maybe"));
    /// ```
    pub fn type_mismatch(value: impl Into<String>, expected: impl Into<String>) -> Self {
        Error::TypeMismatch {
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Creates an invalid-number error naming the formatter that rejected
    /// the value.
    pub fn invalid_number(value: impl fmt::Display, formatter: impl Into<String>) -> Self {
        Error::InvalidNumber {
            value: value.to_string(),
            formatter: formatter.into(),
        }
    }

    /// Creates an unsupported-shape error for container kinds the flat
    /// format cannot represent.
    pub fn unsupported_shape(msg: impl Into<String>) -> Self {
        Error::UnsupportedShape(msg.into())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
