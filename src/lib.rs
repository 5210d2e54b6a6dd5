//! # serde_flatcsv
//!
//! A Serde-compatible codec between nested record types and flat delimited
//! text: one row per record, one column per leaf field.
//!
//! ## How it works
//!
//! Encoding walks a record's structure and flattens every leaf into a cell
//! keyed by its *path* — the field names (and sequence indices) from the root
//! to that leaf, joined with a configurable separator. Decoding mirrors the
//! walk over the target type, looking each path key up in the header shared
//! by the batch. Nesting of any depth collapses into columns and comes back
//! intact:
//!
//! ```text
//! struct Order { id: u32, customer: Customer }
//! struct Customer { name: String, vip: bool }
//!
//! id,customer name,customer vip
//! 7,Alice,true
//! ```
//!
//! ## Key Features
//!
//! - **Flattening**: unbounded nesting of structs, maps, tuples, and arrays
//!   encodes to flat columns; round trips are exact for fixed-arity shapes
//! - **Serde Compatible**: works with `#[derive(Serialize, Deserialize)]`
//! - **Header Policies**: infer from the first line, supply your own header,
//!   or layer a rename mapping over an inferred one
//! - **Row Augmentation**: attach computed or supplied columns to decoded
//!   rows before re-encoding ([`Csv::formula`], [`Csv::attach`], [`Csv::fill`])
//! - **Strict Errors**: duplicate keys, missing columns, and unparsable cells
//!   fail the row loudly; nothing is silently defaulted
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_flatcsv::{from_str, to_string, Csv};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let csv = "id,name,active\n1,Alice,true\n2,Bob,false";
//!
//! let users: Csv<User> = from_str(csv).unwrap();
//! assert_eq!(users[0], User { id: 1, name: "Alice".to_string(), active: true });
//!
//! // Encoding with an inferred header reproduces the text
//! assert_eq!(to_string(&users).unwrap(), csv);
//! ```
//!
//! ### Nested records
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_flatcsv::{from_str, to_string, Csv, CsvOptions};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Foo { foo: Bar }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Bar { bar: i64 }
//!
//! let options = CsvOptions::new().with_key_separator(" - ");
//! let table = Csv::from(vec![Foo { foo: Bar { bar: 42 } }]);
//!
//! let csv = serde_flatcsv::to_string_with_options(
//!     &table,
//!     options.clone(),
//!     serde_flatcsv::EncodeHeader::Infer,
//! ).unwrap();
//! assert_eq!(csv, "foo - bar\n42");
//! ```
//!
//! ### Optional fields
//!
//! Absent values encode as the configured nil symbol (default `?`) and decode
//! back to `None`; any other text goes through the wrapped leaf's parser.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_flatcsv::{from_str, to_string, Csv};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Reading { sensor: String, value: Option<f64> }
//!
//! let table: Csv<Reading> = from_str("sensor,value\nt0,21.5\nt1,?").unwrap();
//! assert_eq!(table[1].value, None);
//! assert_eq!(to_string(&table).unwrap(), "sensor,value\nt0,21.5\nt1,?");
//! ```
//!
//! ## Limitations
//!
//! No quoting or escaping dialect is defined: a string payload containing the
//! active column or row separator is not representable and will corrupt
//! output. Variable-length sequences cannot be decoded (the flat form cannot
//! say where they end); fixed-arity tuples and arrays can. Rows are processed
//! independently — callers wanting parallel batches can share the options and
//! header across threads freely.

pub mod attach;
pub mod csv;
pub mod de;
pub mod error;
pub mod header;
pub mod options;
pub mod path;
pub mod row;
pub mod ser;
pub mod value;

pub use attach::{AttachValue, Formula};
pub use csv::Csv;
pub use de::{CsvDecoder, Deserializer};
pub use error::{Error, Result};
pub use header::{DecodeHeader, EncodeHeader, Header};
pub use options::{CsvOptions, NumberFormat, Numeric};
pub use row::Row;
pub use ser::{CsvEncoder, Serializer, ValueSerializer};
pub use value::{Number, Value};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io;

/// Encodes one record into its flat row mapping with default options.
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::to_row;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let row = to_row(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(row.get("x"), Some("1"));
/// ```
///
/// # Errors
///
/// Returns an error if two leaves flatten to the same key or a number cannot
/// be formatted.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_row<T>(value: &T) -> Result<Row>
where
    T: ?Sized + Serialize,
{
    to_row_with_options(value, CsvOptions::default())
}

/// Encodes one record into its flat row mapping with custom options.
///
/// # Errors
///
/// Returns an error if two leaves flatten to the same key or a number cannot
/// be formatted.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_row_with_options<T>(value: &T, options: CsvOptions) -> Result<Row>
where
    T: ?Sized + Serialize,
{
    CsvEncoder::with_options(options).encode_row(value)
}

/// Encodes a table to delimited text with default options and an inferred
/// header.
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::{to_string, Csv};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let table = Csv::from(vec![Point { x: 1, y: 2 }]);
/// assert_eq!(to_string(&table).unwrap(), "x,y\n1,2");
/// ```
///
/// # Errors
///
/// Returns an error if any row fails to encode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<R>(csv: &Csv<R>) -> Result<String>
where
    R: Serialize,
{
    to_string_with_options(csv, CsvOptions::default(), EncodeHeader::Infer)
}

/// Encodes a table to delimited text with custom options and header policy.
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::{to_string_with_options, Csv, CsvOptions, EncodeHeader};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let table = Csv::from(vec![Point { x: 1, y: 2 }]);
/// let csv = to_string_with_options(&table, CsvOptions::default(), EncodeHeader::Omit).unwrap();
/// assert_eq!(csv, "1,2");
/// ```
///
/// # Errors
///
/// Returns an error if any row fails to encode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<R>(
    csv: &Csv<R>,
    options: CsvOptions,
    header: EncodeHeader,
) -> Result<String>
where
    R: Serialize,
{
    CsvEncoder::with_options(options).encode(csv, header)
}

/// Encodes a table to a writer with default options and an inferred header.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, R>(writer: W, csv: &Csv<R>) -> Result<()>
where
    W: io::Write,
    R: Serialize,
{
    to_writer_with_options(writer, csv, CsvOptions::default(), EncodeHeader::Infer)
}

/// Encodes a table to a writer with custom options and header policy.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, R>(
    mut writer: W,
    csv: &Csv<R>,
    options: CsvOptions,
    header: EncodeHeader,
) -> Result<()>
where
    W: io::Write,
    R: Serialize,
{
    let text = to_string_with_options(csv, options, header)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(e.to_string()))?;
    Ok(())
}

/// Converts any `T: Serialize` to a dynamic [`Value`].
///
/// Useful when a row's shape is only known at runtime, and the bridge the
/// row augmentation helpers are built on.
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::to_value;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented (e.g. a map with
/// non-string keys).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Decodes delimited text into a table, treating the first line as the
/// header.
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::{from_str, Csv};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let table: Csv<Point> = from_str("x,y\n1,2").unwrap();
/// assert_eq!(table[0], Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error on empty input, a malformed header, or the first row
/// that fails to decode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<'de, T>(s: &'de str) -> Result<Csv<T>>
where
    T: Deserialize<'de>,
{
    CsvDecoder::new().decode(s, DecodeHeader::FirstLine)
}

/// Decodes delimited text into a table with custom options and header policy.
///
/// # Errors
///
/// Returns an error on empty input, a malformed header, or the first row
/// that fails to decode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<'de, T>(
    s: &'de str,
    options: CsvOptions,
    header: DecodeHeader,
) -> Result<Csv<T>>
where
    T: Deserialize<'de>,
{
    CsvDecoder::with_options(options).decode(s, header)
}

/// Decodes one record from its flat row mapping with default options.
///
/// The inverse of [`to_row`].
///
/// # Errors
///
/// Returns an error if a required key is missing or a cell fails to parse.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_row<T>(row: &Row) -> Result<T>
where
    T: DeserializeOwned,
{
    CsvDecoder::new().decode_row(row)
}

/// Decodes a table from an I/O reader, treating the first line as the header.
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::{from_reader, Csv};
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let table: Csv<Point> = from_reader(Cursor::new(b"x,y\n1,2")).unwrap();
/// assert_eq!(table[0], Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not UTF-8, or decoding
/// fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<Csv<T>>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(e.to_string()))?;
    from_str(&text)
}
