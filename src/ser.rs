//! Flattening encoder.
//!
//! This module provides the [`Serializer`] that walks a record's field
//! structure and accumulates a [`Row`]: an ordered mapping from flattened
//! path key to formatted cell text. Nested keyed fields extend the current
//! path with their name; sequence elements extend it with contiguous
//! zero-based indices; leaves join the path with the configured key
//! separator and insert their formatted text.
//!
//! Inserting a key twice is a hard error — two fields whose names join to
//! the same flattened key are a schema defect, and the encoder refuses to
//! pick a winner.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_flatcsv::to_row;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Order { id: u32, customer: Customer }
//!
//! #[derive(Serialize)]
//! struct Customer { name: String, vip: bool }
//!
//! let order = Order {
//!     id: 7,
//!     customer: Customer { name: "Alice".to_string(), vip: true },
//! };
//!
//! let row = to_row(&order).unwrap();
//! assert_eq!(row.get("id"), Some("7"));
//! assert_eq!(row.get("customer name"), Some("Alice"));
//! assert_eq!(row.get("customer vip"), Some("true"));
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_flatcsv::{CsvOptions, Serializer};
//! use serde::Serialize;
//!
//! let mut serializer = Serializer::new(CsvOptions::default());
//! vec![10, 20, 30].serialize(&mut serializer).unwrap();
//!
//! let row = serializer.into_row();
//! assert_eq!(row.get("1"), Some("20"));
//! ```

use crate::header::EncodeHeader;
use crate::path::{join, Segment};
use crate::{Csv, CsvOptions, Error, Number, Result, Row, Value};
use indexmap::IndexMap;
use serde::{ser, Serialize};

/// The flattening serializer.
///
/// Converts one record implementing `Serialize` into a [`Row`]. Holds no
/// state across records; the accumulator and current path belong to a single
/// traversal and are threaded by exclusive reference through its recursion.
pub struct Serializer {
    row: Row,
    path: Vec<Segment>,
    options: CsvOptions,
}

impl Serializer {
    pub fn new(options: CsvOptions) -> Self {
        Serializer {
            row: Row::new(),
            path: Vec::new(),
            options,
        }
    }

    pub fn into_row(self) -> Row {
        self.row
    }

    fn insert_leaf(&mut self, value: String) -> Result<()> {
        let key = join(&self.path, &self.options.key_separator);
        self.row.insert(key, value)
    }

    fn insert_int(&mut self, value: i64) -> Result<()> {
        let text = self
            .options
            .number_format
            .int(value)
            .ok_or_else(|| Error::invalid_number(value, self.options.number_format.name()))?;
        self.insert_leaf(text)
    }

    fn insert_uint(&mut self, value: u64) -> Result<()> {
        let text = self
            .options
            .number_format
            .uint(value)
            .ok_or_else(|| Error::invalid_number(value, self.options.number_format.name()))?;
        self.insert_leaf(text)
    }

    fn insert_float(&mut self, value: f64) -> Result<()> {
        let text = self
            .options
            .number_format
            .float(value)
            .ok_or_else(|| Error::invalid_number(value, self.options.number_format.name()))?;
        self.insert_leaf(text)
    }
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = SeqSerializer<'a>;
    type SerializeTupleStruct = SeqSerializer<'a>;
    type SerializeTupleVariant = SeqSerializer<'a>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = StructSerializer<'a>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        self.insert_leaf(if v { "true" } else { "false" }.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        self.insert_int(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        self.insert_int(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        self.insert_int(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        self.insert_int(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        self.insert_uint(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        self.insert_uint(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        self.insert_uint(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        self.insert_uint(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        self.insert_float(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
        self.insert_float(v)
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        self.insert_leaf(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        self.insert_leaf(v.to_string())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        use ser::SerializeSeq;
        let mut seq = self.serialize_seq(Some(v.len()))?;
        for byte in v {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        let nil = self.options.nil_symbol.clone();
        self.insert_leaf(nil)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        let nil = self.options.nil_symbol.clone();
        self.insert_leaf(nil)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        self.path.push(Segment::Key(variant.to_string()));
        let result = value.serialize(&mut *self);
        self.path.pop();
        result
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqSerializer {
            ser: self,
            index: 0,
            variant: false,
        })
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(None)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(None)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.path.push(Segment::Key(variant.to_string()));
        Ok(SeqSerializer {
            ser: self,
            index: 0,
            variant: true,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            ser: self,
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer {
            ser: self,
            variant: false,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.path.push(Segment::Key(variant.to_string()));
        Ok(StructSerializer {
            ser: self,
            variant: true,
        })
    }
}

pub struct SeqSerializer<'a> {
    ser: &'a mut Serializer,
    index: usize,
    variant: bool,
}

impl<'a> SeqSerializer<'a> {
    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.ser.path.push(Segment::Index(self.index));
        self.index += 1;
        let result = value.serialize(&mut *self.ser);
        self.ser.path.pop();
        result
    }

    fn finish(self) -> Result<()> {
        if self.variant {
            self.ser.path.pop();
        }
        Ok(())
    }
}

impl<'a> ser::SerializeSeq for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.finish()
    }
}

impl<'a> ser::SerializeTuple for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.finish()
    }
}

impl<'a> ser::SerializeTupleStruct for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.finish()
    }
}

impl<'a> ser::SerializeTupleVariant for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.finish()
    }
}

pub struct MapSerializer<'a> {
    ser: &'a mut Serializer,
    current_key: Option<String>,
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(Error::Message("map keys must be strings".to_string())),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::Message("serialize_value called without serialize_key".into()))?;
        self.ser.path.push(Segment::Key(key));
        let result = value.serialize(&mut *self.ser);
        self.ser.path.pop();
        result
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

pub struct StructSerializer<'a> {
    ser: &'a mut Serializer,
    variant: bool,
}

impl<'a> StructSerializer<'a> {
    fn field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.ser.path.push(Segment::Key(key.to_string()));
        let result = value.serialize(&mut *self.ser);
        self.ser.path.pop();
        result
    }

    fn finish(self) -> Result<()> {
        if self.variant {
            self.ser.path.pop();
        }
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.finish()
    }
}

impl<'a> ser::SerializeStructVariant for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.finish()
    }
}

/// Row-to-text driver with a configurable header policy.
///
/// # Examples
///
/// ```rust
/// use serde_flatcsv::{Csv, CsvEncoder, EncodeHeader};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Reading { sensor: String, value: f64 }
///
/// let table = Csv::from(vec![
///     Reading { sensor: "t0".to_string(), value: 21.5 },
///     Reading { sensor: "t1".to_string(), value: 19.0 },
/// ]);
///
/// let encoder = CsvEncoder::new();
/// let csv = encoder.encode(&table, EncodeHeader::Infer).unwrap();
/// assert_eq!(csv, "sensor,value\nt0,21.5\nt1,19");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvEncoder {
    pub options: CsvOptions,
}

impl CsvEncoder {
    /// Creates an encoder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with the given options.
    #[must_use]
    pub fn with_options(options: CsvOptions) -> Self {
        CsvEncoder { options }
    }

    /// Encodes one record into its flat row mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if two leaves flatten to the same key,
    /// or [`Error::InvalidNumber`] if the number format declines a value.
    pub fn encode_row<T>(&self, value: &T) -> Result<Row>
    where
        T: ?Sized + Serialize,
    {
        let mut serializer = Serializer::new(self.options.clone());
        value.serialize(&mut serializer)?;
        Ok(serializer.into_row())
    }

    /// Encodes a table to delimited text under a header policy.
    ///
    /// The first row's keys determine the header line (for the inferring and
    /// renaming policies); every row contributes one line of cell text in its
    /// own column order. An empty table encodes to an empty string.
    ///
    /// # Errors
    ///
    /// Fails on the first row that fails to encode; no partial text is
    /// returned.
    pub fn encode<R>(&self, csv: &Csv<R>, header: EncodeHeader) -> Result<String>
    where
        R: Serialize,
    {
        let rows = csv
            .rows()
            .iter()
            .map(|row| self.encode_row(row))
            .collect::<Result<Vec<_>>>()?;

        let separator = self.options.separator.to_string();
        let mut lines: Vec<String> = Vec::with_capacity(rows.len() + 1);

        if let Some(first) = rows.first() {
            match header {
                EncodeHeader::Omit => {}
                EncodeHeader::Infer => {
                    lines.push(first.keys().collect::<Vec<_>>().join(&separator));
                }
                EncodeHeader::Rename(ref mapping) => {
                    let renamed = first.header().renamed(mapping);
                    lines.push(renamed.keys_by_column().join(&separator));
                }
            }
        }

        for row in &rows {
            lines.push(row.values().collect::<Vec<_>>().join(&separator));
        }

        Ok(lines.join(&self.options.row_separator.to_string()))
    }
}

/// Serializer producing a dynamic [`Value`] instead of a row.
///
/// Backs [`to_value`](crate::to_value); useful when a record's fields need
/// inspecting or splicing before they hit the flattening codec (this is how
/// the row augmentation helpers work).
pub struct ValueSerializer;

pub struct ValueSeqSerializer {
    elements: Vec<Value>,
}

pub struct ValueMapSerializer {
    fields: IndexMap<String, Value>,
    current_key: Option<String>,
}

pub struct ValueVariantSerializer {
    variant: &'static str,
    inner: ValueSeqSerializer,
}

pub struct ValueStructVariantSerializer {
    variant: &'static str,
    inner: ValueMapSerializer,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = ValueSeqSerializer;
    type SerializeTuple = ValueSeqSerializer;
    type SerializeTupleStruct = ValueSeqSerializer;
    type SerializeTupleVariant = ValueVariantSerializer;
    type SerializeMap = ValueMapSerializer;
    type SerializeStruct = ValueMapSerializer;
    type SerializeStructVariant = ValueStructVariantSerializer;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        if v <= i64::MAX as u64 {
            Ok(Value::Number(Number::Integer(v as i64)))
        } else {
            Ok(Value::Number(Number::Float(v as f64)))
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Number(Number::Float(v as f64)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(
            v.iter()
                .map(|&b| Value::Number(Number::Integer(b as i64)))
                .collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut fields = IndexMap::with_capacity(1);
        fields.insert(variant.to_string(), to_value(value)?);
        Ok(Value::Object(fields))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ValueSeqSerializer> {
        Ok(ValueSeqSerializer {
            elements: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<ValueSeqSerializer> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<ValueSeqSerializer> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<ValueVariantSerializer> {
        Ok(ValueVariantSerializer {
            variant,
            inner: ValueSeqSerializer {
                elements: Vec::with_capacity(len),
            },
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<ValueMapSerializer> {
        Ok(ValueMapSerializer {
            fields: IndexMap::new(),
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<ValueMapSerializer> {
        Ok(ValueMapSerializer {
            fields: IndexMap::with_capacity(len),
            current_key: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<ValueStructVariantSerializer> {
        Ok(ValueStructVariantSerializer {
            variant,
            inner: ValueMapSerializer {
                fields: IndexMap::with_capacity(len),
                current_key: None,
            },
        })
    }
}

impl ser::SerializeSeq for ValueSeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.elements.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.elements))
    }
}

impl ser::SerializeTuple for ValueSeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.elements.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.elements))
    }
}

impl ser::SerializeTupleStruct for ValueSeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.elements.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.elements))
    }
}

impl ser::SerializeTupleVariant for ValueVariantSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.elements.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut fields = IndexMap::with_capacity(1);
        fields.insert(self.variant.to_string(), Value::Array(self.inner.elements));
        Ok(Value::Object(fields))
    }
}

impl ser::SerializeMap for ValueMapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(Error::Message("map keys must be strings".to_string())),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::Message("serialize_value called without serialize_key".into()))?;
        self.fields.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.fields))
    }
}

impl ser::SerializeStruct for ValueMapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.fields.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.fields))
    }
}

impl ser::SerializeStructVariant for ValueStructVariantSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.fields.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut fields = IndexMap::with_capacity(1);
        fields.insert(self.variant.to_string(), Value::Object(self.inner.fields));
        Ok(Value::Object(fields))
    }
}

pub(crate) fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Inner {
        bar: i64,
    }

    #[derive(Serialize)]
    struct Outer {
        foo: Inner,
        tag: String,
    }

    fn encode<T: Serialize>(value: &T) -> Result<Row> {
        CsvEncoder::new().encode_row(value)
    }

    #[test]
    fn flattens_nested_keys() {
        let row = encode(&Outer {
            foo: Inner { bar: 42 },
            tag: "x".to_string(),
        })
        .unwrap();

        let keys: Vec<_> = row.keys().collect();
        assert_eq!(keys, vec!["foo bar", "tag"]);
        assert_eq!(row.get("foo bar"), Some("42"));
    }

    #[test]
    fn sequence_indices_are_contiguous() {
        #[derive(Serialize)]
        struct Holder {
            items: Vec<u8>,
        }

        let row = encode(&Holder {
            items: vec![9, 8, 7],
        })
        .unwrap();
        let keys: Vec<_> = row.keys().collect();
        assert_eq!(keys, vec!["items 0", "items 1", "items 2"]);
    }

    #[test]
    fn none_encodes_as_nil_symbol() {
        #[derive(Serialize)]
        struct Sparse {
            a: Option<i64>,
        }

        let row = encode(&Sparse { a: None }).unwrap();
        assert_eq!(row.get("a"), Some("?"));
    }

    #[test]
    fn colliding_keys_are_rejected() {
        #[derive(Serialize)]
        struct A {
            b: i64,
        }

        // "a b" both as a nested leaf and as a literal field name.
        #[derive(Serialize)]
        struct Colliding {
            a: A,
            #[serde(rename = "a b")]
            also: i64,
        }

        let err = encode(&Colliding {
            a: A { b: 1 },
            also: 2,
        })
        .unwrap_err();
        assert_eq!(err, Error::DuplicateKey { key: "a b".into() });
    }

    #[test]
    fn number_format_failure_names_formatter() {
        use crate::NumberFormat;

        #[derive(Debug)]
        struct NoFloats;

        impl NumberFormat for NoFloats {
            fn int(&self, v: i64) -> Option<String> {
                Some(v.to_string())
            }
            fn uint(&self, v: u64) -> Option<String> {
                Some(v.to_string())
            }
            fn float(&self, _v: f64) -> Option<String> {
                None
            }
            fn name(&self) -> &str {
                "NoFloats"
            }
        }

        let encoder =
            CsvEncoder::with_options(CsvOptions::default().with_number_format(NoFloats));
        let err = encoder.encode_row(&1.5f64).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidNumber {
                value: "1.5".into(),
                formatter: "NoFloats".into()
            }
        );
    }
}
