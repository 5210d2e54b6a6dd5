//! Header resolution: mapping flattened keys to column indices.
//!
//! A [`Header`] is built once per batch and shared read-only by every row
//! decode in that batch. It can be inferred from the first line of input,
//! supplied verbatim by the caller, or produced by layering a rename mapping
//! over an inferred header.
//!
//! ## Rename soft merge
//!
//! The rename policies re-key an existing header: each `(new_key, old_key)`
//! entry republishes `old_key`'s column index under `new_key`. An `old_key`
//! absent from the underlying header is dropped silently rather than
//! rejected; if the dropped key was required by the target shape, the miss
//! surfaces later as an ordinary [`Error::KeyNotFound`] during row decode.
//!
//! [`Error::KeyNotFound`]: crate::Error::KeyNotFound

use crate::{Error, Result};
use indexmap::IndexMap;

/// Maps flattened keys to column indices for one decode batch.
///
/// Built once, never mutated during decode, safe to share across rows.
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::Header;
///
/// let header = Header::infer(&["a1", "a2", "a3"]).unwrap();
/// assert_eq!(header.get("a2"), Some(1));
/// assert_eq!(header.get("a4"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header(IndexMap<String, usize>);

impl Header {
    /// Creates an empty header.
    #[must_use]
    pub fn new() -> Self {
        Header(IndexMap::new())
    }

    /// Builds a header from the column texts of a header line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateColumn`](crate::Error::DuplicateColumn)
    /// naming both conflicting indices and the shared text if two columns
    /// carry the same text.
    pub fn infer(columns: &[&str]) -> Result<Self> {
        let mut header = IndexMap::with_capacity(columns.len());
        for (index, text) in columns.iter().enumerate() {
            if let Some(first) = header.insert(text.to_string(), index) {
                return Err(Error::DuplicateColumn {
                    first,
                    second: index,
                    text: text.to_string(),
                });
            }
        }
        Ok(Header(header))
    }

    /// Re-keys this header through a rename mapping.
    ///
    /// Every `(new_key, old_key)` entry whose `old_key` is present
    /// republishes its column index under `new_key`; absent `old_key`s are
    /// dropped from the result.
    #[must_use]
    pub fn renamed(&self, mapping: &IndexMap<String, String>) -> Self {
        Header(
            mapping
                .iter()
                .filter_map(|(new_key, old_key)| {
                    self.0.get(old_key).map(|&index| (new_key.clone(), index))
                })
                .collect(),
        )
    }

    /// Adds or replaces a key's column index.
    pub fn insert(&mut self, key: String, index: usize) {
        self.0.insert(key, index);
    }

    /// Returns the column index of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.get(key).copied()
    }

    /// Returns the number of mapped keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no keys are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the mapped keys ordered by their column index.
    ///
    /// This is the order a header line is written in, and the order map
    /// decoding visits keys.
    #[must_use]
    pub fn keys_by_column(&self) -> Vec<&str> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by_key(|(_, &index)| index);
        entries.into_iter().map(|(key, _)| key.as_str()).collect()
    }

    /// Iterates over `(key, index)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, &i)| (k.as_str(), i))
    }
}

impl FromIterator<(String, usize)> for Header {
    fn from_iter<T: IntoIterator<Item = (String, usize)>>(iter: T) -> Self {
        Header(IndexMap::from_iter(iter))
    }
}

/// Header policy for encoding a table to text.
#[derive(Debug, Clone, Default)]
pub enum EncodeHeader {
    /// Write data lines only.
    Omit,
    /// Lead with the first row's keys in column order.
    #[default]
    Infer,
    /// Lead with the first row's keys re-keyed through a rename mapping
    /// (`new_key -> old_key`, soft merge).
    Rename(IndexMap<String, String>),
}

/// Header policy for decoding text to a table.
#[derive(Debug, Clone, Default)]
pub enum DecodeHeader {
    /// Infer the header from the first line and skip it for data.
    #[default]
    FirstLine,
    /// Use a caller-supplied header; `skip_first_line` independently controls
    /// whether the first line of input is consumed without producing a row.
    Supplied {
        header: Header,
        skip_first_line: bool,
    },
    /// Infer from the first line, then re-key through a rename mapping
    /// (`new_key -> old_key`, soft merge). Skips the first line.
    Rename(IndexMap<String, String>),
}

impl DecodeHeader {
    /// Resolves the policy against the first line of a batch, yielding the
    /// header every row will share and whether that line was consumed.
    pub(crate) fn resolve(&self, first_line: &[&str]) -> Result<(Header, bool)> {
        match self {
            DecodeHeader::FirstLine => Ok((Header::infer(first_line)?, true)),
            DecodeHeader::Supplied {
                header,
                skip_first_line,
            } => Ok((header.clone(), *skip_first_line)),
            DecodeHeader::Rename(mapping) => {
                Ok((Header::infer(first_line)?.renamed(mapping), true))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_assigns_sequential_indices() {
        let header = Header::infer(&["a", "b", "c"]).unwrap();
        assert_eq!(header.get("a"), Some(0));
        assert_eq!(header.get("c"), Some(2));
    }

    #[test]
    fn infer_rejects_duplicate_text() {
        let err = Header::infer(&["a", "b", "a"]).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateColumn {
                first: 0,
                second: 2,
                text: "a".into()
            }
        );
    }

    #[test]
    fn rename_drops_missing_sources_silently() {
        let header = Header::infer(&["foo bar"]).unwrap();
        let mut mapping = IndexMap::new();
        mapping.insert("foo".to_string(), "foo bar".to_string());
        mapping.insert("gone".to_string(), "no such column".to_string());

        let renamed = header.renamed(&mapping);
        assert_eq!(renamed.get("foo"), Some(0));
        assert_eq!(renamed.get("gone"), None);
        assert_eq!(renamed.len(), 1);
    }

    #[test]
    fn keys_by_column_sorts_by_index() {
        let header: Header = [("y".to_string(), 1), ("x".to_string(), 0)]
            .into_iter()
            .collect();
        assert_eq!(header.keys_by_column(), vec!["x", "y"]);
    }
}
