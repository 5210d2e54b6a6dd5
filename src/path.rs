//! Path segments and flattened-key construction.
//!
//! A path is the sequence of field identifiers from a record's root to one
//! leaf: string names for keyed fields, zero-based indices for positional
//! ones. Joining a path with the configured key separator yields the
//! flattened key used both as the encoder's map key and the decoder's header
//! lookup. Keys are opaque once joined; nothing in the crate ever re-splits
//! one.

use std::fmt;

/// One step of a path: a field name or a sequence index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Named field of a keyed container.
    Key(String),
    /// Zero-based position within an unkeyed container.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(name) => f.write_str(name),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::Key(name.to_string())
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// Joins a path into a flattened key.
///
/// Applied identically during encode (to build row keys) and decode (to build
/// header lookup keys), which is what makes the two traversals meet on the
/// same strings.
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::path::{join, Segment};
///
/// let path = [Segment::from("foo"), Segment::from("bar")];
/// assert_eq!(join(&path, " - "), "foo - bar");
/// assert_eq!(join(&[], " - "), "");
/// ```
pub fn join(path: &[Segment], key_separator: &str) -> String {
    use std::fmt::Write;

    let mut key = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            key.push_str(key_separator);
        }
        match segment {
            Segment::Key(name) => key.push_str(name),
            Segment::Index(index) => {
                // Writing into a String cannot fail.
                let _ = write!(key, "{}", index);
            }
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_names_and_indices() {
        let path = [
            Segment::from("items"),
            Segment::from(2usize),
            Segment::from("sku"),
        ];
        assert_eq!(join(&path, " "), "items 2 sku");
    }

    #[test]
    fn single_segment_has_no_separator() {
        assert_eq!(join(&[Segment::from("a1")], " - "), "a1");
    }

    #[test]
    fn large_indices_format_fully() {
        assert_eq!(join(&[Segment::from(1_000_000usize)], " "), "1000000");
    }
}
