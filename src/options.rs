//! Configuration options for CSV encoding and decoding.
//!
//! This module provides types to customize the wire format:
//!
//! - [`CsvOptions`]: Main configuration struct (separators, nil symbol,
//!   number formatting)
//! - [`NumberFormat`]: Pluggable numeric leaf formatter
//!
//! ## Examples
//!
//! ```rust
//! use serde_flatcsv::{CsvOptions, to_string_with_options, EncodeHeader, Csv};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i64, y: i64 }
//!
//! let table = Csv::from(vec![Data { x: 1, y: 2 }]);
//!
//! // Semicolon-separated cells, nested keys joined with a dot
//! let options = CsvOptions::new()
//!     .with_separator(';')
//!     .with_key_separator(".");
//! let csv = to_string_with_options(&table, options, EncodeHeader::Infer).unwrap();
//! assert_eq!(csv, "x;y\n1;2");
//! ```

use std::fmt;
use std::sync::Arc;

/// Formats numeric leaf values into cell text.
///
/// The format may decline a value by returning `None`, which surfaces as
/// [`Error::InvalidNumber`](crate::Error::InvalidNumber) naming the value and
/// the formatter. Parsing on the decode side is intentionally *not* routed
/// through this trait: cell text is parsed with the standard `str::parse`
/// rules, so a custom format must emit text those rules accept if encoded
/// output is meant to round-trip.
///
/// Implementations are shared read-only across rows (and across threads, if
/// the caller parallelizes a batch), hence the `Send + Sync` bound.
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::NumberFormat;
///
/// /// Rejects every float, forcing integer-only tables.
/// #[derive(Debug)]
/// struct IntegersOnly;
///
/// impl NumberFormat for IntegersOnly {
///     fn int(&self, value: i64) -> Option<String> { Some(value.to_string()) }
///     fn uint(&self, value: u64) -> Option<String> { Some(value.to_string()) }
///     fn float(&self, _value: f64) -> Option<String> { None }
///     fn name(&self) -> &str { "IntegersOnly" }
/// }
/// ```
pub trait NumberFormat: fmt::Debug + Send + Sync {
    /// Renders a signed integer, or `None` if the value is not representable.
    fn int(&self, value: i64) -> Option<String>;

    /// Renders an unsigned integer, or `None` if the value is not representable.
    fn uint(&self, value: u64) -> Option<String>;

    /// Renders a floating point value, or `None` if the value is not representable.
    fn float(&self, value: f64) -> Option<String>;

    /// Identity used in [`Error::InvalidNumber`](crate::Error::InvalidNumber) messages.
    fn name(&self) -> &str;
}

/// The default number format: plain `Display` rendering.
///
/// Integer-valued floats render without a fractional part (`2.0` becomes
/// `"2"`), which keeps encode/decode round trips exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct Numeric;

impl NumberFormat for Numeric {
    fn int(&self, value: i64) -> Option<String> {
        Some(value.to_string())
    }

    fn uint(&self, value: u64) -> Option<String> {
        Some(value.to_string())
    }

    fn float(&self, value: f64) -> Option<String> {
        Some(value.to_string())
    }

    fn name(&self) -> &str {
        "Numeric"
    }
}

/// Configuration for one encoder/decoder instance.
///
/// Immutable for the lifetime of the instance and cheap to clone; the number
/// format is behind an [`Arc`] so cloned options share it.
///
/// | Field           | Default  |
/// |-----------------|----------|
/// | `separator`     | `,`      |
/// | `row_separator` | `\n`     |
/// | `key_separator` | `" "`    |
/// | `number_format` | [`Numeric`] |
/// | `nil_symbol`    | `?`      |
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::CsvOptions;
///
/// let options = CsvOptions::new()
///     .with_key_separator(" - ")
///     .with_nil_symbol("NA");
/// assert_eq!(options.separator, ',');
/// assert_eq!(options.nil_symbol, "NA");
/// ```
#[derive(Clone, Debug)]
pub struct CsvOptions {
    /// Column separator within a row.
    pub separator: char,
    /// Row separator between records.
    pub row_separator: char,
    /// Joins path segments into flattened keys.
    pub key_separator: String,
    /// Renders numeric leaves into cell text.
    pub number_format: Arc<dyn NumberFormat>,
    /// Cell text standing in for an absent optional value.
    pub nil_symbol: String,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            separator: ',',
            row_separator: '\n',
            key_separator: " ".to_string(),
            number_format: Arc::new(Numeric),
            nil_symbol: "?".to_string(),
        }
    }
}

impl CsvOptions {
    /// Creates the default options (comma cells, newline rows, space-joined
    /// keys, `?` for nil).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the column separator.
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the row separator.
    #[must_use]
    pub fn with_row_separator(mut self, row_separator: char) -> Self {
        self.row_separator = row_separator;
        self
    }

    /// Sets the string that joins path segments into flattened keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_flatcsv::CsvOptions;
    ///
    /// let options = CsvOptions::new().with_key_separator(" - ");
    /// assert_eq!(options.key_separator, " - ");
    /// ```
    #[must_use]
    pub fn with_key_separator(mut self, key_separator: impl Into<String>) -> Self {
        self.key_separator = key_separator.into();
        self
    }

    /// Sets the numeric leaf formatter.
    #[must_use]
    pub fn with_number_format(mut self, format: impl NumberFormat + 'static) -> Self {
        self.number_format = Arc::new(format);
        self
    }

    /// Sets the cell text standing in for an absent optional value.
    #[must_use]
    pub fn with_nil_symbol(mut self, nil_symbol: impl Into<String>) -> Self {
        self.nil_symbol = nil_symbol.into();
        self
    }
}
