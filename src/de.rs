//! Structural decoder.
//!
//! This module provides the [`Deserializer`] that mirrors the encoder's
//! traversal over a *target* shape instead of a source value: at each leaf it
//! joins the current path into a flattened key, looks the key up in the
//! batch's shared [`Header`], indexes the row's cells, and parses the text
//! against the leaf's declared kind. Because both traversals extend paths
//! identically, any key the encoder produced is reproduced exactly here,
//! which is what makes encode/decode round trips the identity.
//!
//! The flat format is not self-describing; shapes the header cannot answer
//! for — variable-length sequences, data-carrying enum variants — are
//! rejected with [`Error::UnsupportedShape`] rather than guessed at.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_flatcsv::{from_str, Csv};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Point { x: i64, y: i64 }
//!
//! let table: Csv<Point> = from_str("x,y\n1,2\n3,4").unwrap();
//! assert_eq!(table[1], Point { x: 3, y: 4 });
//! ```

use crate::header::{DecodeHeader, Header};
use crate::path::{join, Segment};
use crate::{Csv, CsvOptions, Error, Result, Row};
use serde::de::{self, IntoDeserializer};

/// The structural deserializer for one row.
///
/// Holds the batch's read-only header and options plus the row's cells, and
/// threads the current traversal path by exclusive reference, exactly like
/// the encoder.
pub struct Deserializer<'de, 'a> {
    header: &'a Header,
    columns: &'a [&'de str],
    path: Vec<Segment>,
    options: &'a CsvOptions,
}

impl<'de, 'a> Deserializer<'de, 'a> {
    pub fn new(header: &'a Header, columns: &'a [&'de str], options: &'a CsvOptions) -> Self {
        Deserializer {
            header,
            columns,
            path: Vec::new(),
            options,
        }
    }

    /// Resolves the current path to its cell text.
    fn cell(&self) -> Result<&'de str> {
        let key = join(&self.path, &self.options.key_separator);
        let index = self
            .header
            .get(&key)
            .ok_or_else(|| Error::key_not_found(key))?;
        self.columns
            .get(index)
            .copied()
            .ok_or(Error::ColumnOutOfBounds {
                index,
                len: self.columns.len(),
            })
    }

    fn parse_cell<T: std::str::FromStr>(&self, expected: &str) -> Result<T> {
        let text = self.cell()?;
        text.parse::<T>()
            .map_err(|_| Error::type_mismatch(text, expected))
    }
}

// One coercion path for every numeric width; the closed set of serde methods
// replaces per-type parsing functions.
macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident : $ty:ty, $expected:literal;)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(self.parse_cell::<$ty>($expected)?)
            }
        )*
    };
}

impl<'de, 'a, 'b> de::Deserializer<'de> for &'b mut Deserializer<'de, 'a> {
    type Error = Error;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_shape(
            "flat rows are not self-describing; a target shape is required",
        ))
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool: bool, "bool";
        deserialize_i8 => visit_i8: i8, "i8";
        deserialize_i16 => visit_i16: i16, "i16";
        deserialize_i32 => visit_i32: i32, "i32";
        deserialize_i64 => visit_i64: i64, "i64";
        deserialize_i128 => visit_i128: i128, "i128";
        deserialize_u8 => visit_u8: u8, "u8";
        deserialize_u16 => visit_u16: u16, "u16";
        deserialize_u32 => visit_u32: u32, "u32";
        deserialize_u64 => visit_u64: u64, "u64";
        deserialize_u128 => visit_u128: u128, "u128";
        deserialize_f32 => visit_f32: f32, "f32";
        deserialize_f64 => visit_f64: f64, "f64";
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.cell()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::type_mismatch(text, "char")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.cell()?)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_shape("byte buffers"))
    }

    fn deserialize_byte_buf<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_shape("byte buffers"))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let key = join(&self.path, &self.options.key_separator);
        match self.header.get(&key) {
            Some(index) => {
                let text = self
                    .columns
                    .get(index)
                    .copied()
                    .ok_or(Error::ColumnOutOfBounds {
                        index,
                        len: self.columns.len(),
                    })?;
                if text == self.options.nil_symbol {
                    visitor.visit_none()
                } else {
                    visitor.visit_some(self)
                }
            }
            // No column under the container's own key: a nested optional
            // record spreads over per-leaf columns, so recurse and let the
            // leaves decide.
            None => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.cell()?;
        if text == self.options.nil_symbol {
            visitor.visit_unit()
        } else {
            Err(Error::type_mismatch(text, "unit"))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_shape(
            "variable-length sequences cannot be decoded from a flat row; use a fixed-arity tuple or array",
        ))
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(FixedSeqAccess {
            de: self,
            len,
            index: 0,
        })
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let keys = self.header.keys_by_column();
        visitor.visit_map(HeaderKeyAccess {
            de: self,
            keys,
            position: 0,
        })
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(FieldAccess {
            de: self,
            fields: fields.iter(),
            current: None,
        })
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(CellEnumAccess { de: self })
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Feeds a struct's statically-declared field names, extending the path for
/// each value.
struct FieldAccess<'de, 'a, 'b> {
    de: &'b mut Deserializer<'de, 'a>,
    fields: std::slice::Iter<'static, &'static str>,
    current: Option<&'static str>,
}

impl<'de, 'a, 'b> de::MapAccess<'de> for FieldAccess<'de, 'a, 'b> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(&field) => {
                self.current = Some(field);
                seed.deserialize(field.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let field = self
            .current
            .take()
            .ok_or_else(|| Error::Message("value requested before key".into()))?;
        self.de.path.push(Segment::Key(field.to_string()));
        let result = seed.deserialize(&mut *self.de);
        self.de.path.pop();
        result
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Feeds every header key at the current path, in column order.
///
/// This is what lets a whole row decode into a string-keyed map when the
/// shape is not known at compile time.
struct HeaderKeyAccess<'de, 'a, 'b> {
    de: &'b mut Deserializer<'de, 'a>,
    keys: Vec<&'a str>,
    position: usize,
}

impl<'de, 'a, 'b> de::MapAccess<'de> for HeaderKeyAccess<'de, 'a, 'b> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.keys.get(self.position) {
            Some(&key) => seed.deserialize(key.into_deserializer()).map(Some),
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let key = self.keys[self.position];
        self.position += 1;
        self.de.path.push(Segment::Key(key.to_string()));
        let result = seed.deserialize(&mut *self.de);
        self.de.path.pop();
        result
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.keys.len() - self.position)
    }
}

/// Walks a fixed-arity container with contiguous indices 0..len.
struct FixedSeqAccess<'de, 'a, 'b> {
    de: &'b mut Deserializer<'de, 'a>,
    len: usize,
    index: usize,
}

impl<'de, 'a, 'b> de::SeqAccess<'de> for FixedSeqAccess<'de, 'a, 'b> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.index >= self.len {
            return Ok(None);
        }
        self.de.path.push(Segment::Index(self.index));
        self.index += 1;
        let result = seed.deserialize(&mut *self.de);
        self.de.path.pop();
        result.map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len - self.index)
    }
}

/// Reads an enum discriminant from the current cell; only unit variants are
/// representable in a single cell.
struct CellEnumAccess<'de, 'a, 'b> {
    de: &'b mut Deserializer<'de, 'a>,
}

impl<'de, 'a, 'b> de::EnumAccess<'de> for CellEnumAccess<'de, 'a, 'b> {
    type Error = Error;
    type Variant = UnitVariantOnly;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let text = self.de.cell()?;
        let variant = seed.deserialize(text.into_deserializer())?;
        Ok((variant, UnitVariantOnly))
    }
}

struct UnitVariantOnly;

impl<'de> de::VariantAccess<'de> for UnitVariantOnly {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, _seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        Err(Error::unsupported_shape("data-carrying enum variants"))
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_shape("data-carrying enum variants"))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_shape("data-carrying enum variants"))
    }
}

/// Text-to-table driver with a configurable header policy.
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::{Csv, CsvDecoder, DecodeHeader, Header};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Pair { a: i64, b: i64 }
///
/// // Headerless input decoded against a caller-supplied header.
/// let header = Header::infer(&["a", "b"]).unwrap();
/// let decoder = CsvDecoder::new();
/// let table: Csv<Pair> = decoder
///     .decode("1,2\n3,4", DecodeHeader::Supplied { header, skip_first_line: false })
///     .unwrap();
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvDecoder {
    pub options: CsvOptions,
}

impl CsvDecoder {
    /// Creates a decoder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder with the given options.
    #[must_use]
    pub fn with_options(options: CsvOptions) -> Self {
        CsvDecoder { options }
    }

    /// Decodes one record from a header and its row of cells.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] for required keys the header lacks and
    /// [`Error::TypeMismatch`] for unparsable cell text.
    pub fn decode_columns<'de, T>(&self, header: &Header, columns: &[&'de str]) -> Result<T>
    where
        T: de::Deserialize<'de>,
    {
        let mut deserializer = Deserializer::new(header, columns, &self.options);
        T::deserialize(&mut deserializer)
    }

    /// Decodes one record from its flat row mapping.
    pub fn decode_row<T>(&self, row: &Row) -> Result<T>
    where
        T: de::DeserializeOwned,
    {
        let header = row.header();
        let columns: Vec<&str> = row.values().collect();
        self.decode_columns(&header, &columns)
    }

    /// Decodes delimited text into a table of records.
    ///
    /// Splits into lines (empty lines are skipped, so a trailing row
    /// separator is harmless), resolves the header policy against the first
    /// line, then decodes each remaining line independently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] if the text contains no lines; otherwise
    /// fails with the first row's error, returning no partial table.
    pub fn decode<'de, R>(&self, text: &'de str, header: DecodeHeader) -> Result<Csv<R>>
    where
        R: de::Deserialize<'de>,
    {
        let rows: Vec<Vec<&str>> = text
            .split(self.options.row_separator)
            .filter(|line| !line.is_empty())
            .map(|line| line.split(self.options.separator).collect())
            .collect();

        let first = rows.first().ok_or(Error::EmptyInput)?;
        let (header, skip_first_line) = header.resolve(first)?;
        let data = if skip_first_line { &rows[1..] } else { &rows[..] };

        let mut stored = Vec::with_capacity(data.len());
        for columns in data {
            stored.push(self.decode_columns(&header, columns)?);
        }
        Ok(Csv::from(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Inner {
        bar: i64,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Outer {
        foo: Inner,
        tag: String,
    }

    fn decode_one<T: de::DeserializeOwned>(keys: &[&str], cells: &[&str]) -> Result<T> {
        let header = Header::infer(keys)?;
        CsvDecoder::new().decode_columns(&header, cells)
    }

    #[test]
    fn rebuilds_nested_structure() {
        let outer: Outer = decode_one(&["foo bar", "tag"], &["42", "x"]).unwrap();
        assert_eq!(
            outer,
            Outer {
                foo: Inner { bar: 42 },
                tag: "x".into()
            }
        );
    }

    #[test]
    fn missing_key_names_the_path() {
        let err = decode_one::<Outer>(&["tag"], &["x"]).unwrap_err();
        assert_eq!(err, Error::KeyNotFound { key: "foo bar".into() });
    }

    #[test]
    fn type_mismatch_names_text_and_kind() {
        let err = decode_one::<Inner>(&["bar"], &["not a number"]).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                value: "not a number".into(),
                expected: "i64".into()
            }
        );
    }

    #[test]
    fn short_row_is_out_of_bounds() {
        let err = decode_one::<Outer>(&["foo bar", "tag"], &["42"]).unwrap_err();
        assert_eq!(err, Error::ColumnOutOfBounds { index: 1, len: 1 });
    }

    #[test]
    fn vec_decode_is_rejected() {
        #[derive(Deserialize, Debug)]
        struct Holder {
            #[allow(dead_code)]
            items: Vec<i64>,
        }

        let err = decode_one::<Holder>(&["items 0"], &["1"]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedShape(_)));
    }

    #[test]
    fn fixed_arity_arrays_decode() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Holder {
            items: [i64; 3],
        }

        let holder: Holder =
            decode_one(&["items 0", "items 1", "items 2"], &["9", "8", "7"]).unwrap();
        assert_eq!(holder.items, [9, 8, 7]);
    }
}
