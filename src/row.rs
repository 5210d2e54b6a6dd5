//! The flat row mapping produced by encoding one record.
//!
//! [`Row`] is an ordered mapping from flattened key to formatted cell text,
//! backed by [`IndexMap`] so cells keep the order in which the encoder's
//! traversal first visited them. That first-seen order is what becomes the
//! column order when no header policy overrides it.
//!
//! A `Row` is created fresh per encode call and consumed immediately to build
//! text; it never outlives the batch that produced it.
//!
//! ## Why IndexMap?
//!
//! Column order matters: the header line and every data line must agree on
//! it, and inferred headers must reproduce the encoder's visit order
//! deterministically. A `HashMap` would scramble columns between runs.
//!
//! ## Examples
//!
//! ```rust
//! use serde_flatcsv::Row;
//!
//! let mut row = Row::new();
//! row.insert("name".to_string(), "Alice".to_string()).unwrap();
//! row.insert("age".to_string(), "30".to_string()).unwrap();
//!
//! assert_eq!(row.get("name"), Some("Alice"));
//! assert!(row.insert("name".to_string(), "Bob".to_string()).is_err());
//! ```

use crate::header::Header;
use crate::{Error, Result};
use indexmap::IndexMap;

/// One record in flat form: flattened key to formatted cell text, in
/// first-seen (column) order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(IndexMap<String, String>);

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Row(IndexMap::new())
    }

    /// Creates an empty row with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Row(IndexMap::with_capacity(capacity))
    }

    /// Inserts a cell under a flattened key.
    ///
    /// Inserting into an already-populated key is a hard error: it means two
    /// leaves of the record joined to the same key, which is a schema defect,
    /// not a recoverable condition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if the key is already present.
    pub fn insert(&mut self, key: String, value: String) -> Result<()> {
        match self.0.entry(key) {
            indexmap::map::Entry::Occupied(entry) => Err(Error::duplicate_key(entry.key().clone())),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Returns the cell stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the column index of `key`, if present.
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.0.get_index_of(key)
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the row has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over keys in column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over cell text in column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// Iterates over `(key, cell)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Builds the key-to-column-index header describing this row.
    ///
    /// Used to decode a single row back without going through text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_flatcsv::{to_row, from_row};
    /// use serde::{Serialize, Deserialize};
    ///
    /// #[derive(Serialize, Deserialize, PartialEq, Debug)]
    /// struct Point { x: i64, y: i64 }
    ///
    /// let row = to_row(&Point { x: 1, y: 2 }).unwrap();
    /// assert_eq!(row.header().get("y"), Some(1));
    /// let point: Point = from_row(&row).unwrap();
    /// assert_eq!(point, Point { x: 1, y: 2 });
    /// ```
    #[must_use]
    pub fn header(&self) -> Header {
        self.0
            .keys()
            .enumerate()
            .map(|(index, key)| (key.clone(), index))
            .collect()
    }
}

impl IntoIterator for Row {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
