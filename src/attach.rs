//! Row augmentation: synthetic columns attached before encoding.
//!
//! Two wrappers extend a record with extra columns without touching its
//! type:
//!
//! - [`Formula`] computes a value from the row itself and encodes it under a
//!   caller-chosen key (a spreadsheet formula column).
//! - [`AttachValue`] carries an externally supplied record whose fields are
//!   appended after the row's own.
//!
//! Both are encode-side only. They serialize by flattening the wrapped
//! record to a dynamic [`Value`](crate::Value) and re-emitting its fields
//! followed by the attachment, so the augmented row flows through any
//! `serde::Serializer` — in particular the flattening encoder, which will
//! reject a collision between an attached key and an existing column as an
//! ordinary duplicate-key error.
//!
//! ## Examples
//!
//! ```rust
//! use serde_flatcsv::{from_str, to_string, Csv};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Reading { celsius: f64 }
//!
//! let table: Csv<Reading> = from_str("celsius\n0\n100").unwrap();
//! let augmented = table.formula("fahrenheit", |r| r.celsius * 1.8 + 32.0);
//!
//! assert_eq!(
//!     to_string(&augmented).unwrap(),
//!     "celsius,fahrenheit\n0,32\n100,212",
//! );
//! ```

use crate::value::Value;
use crate::Error;
use serde::ser::{self, Serialize, SerializeMap, Serializer};

/// A record wrapped with a computed column.
///
/// Created by [`Csv::formula`](crate::Csv::formula). The computed value is
/// evaluated at encode time from the underlying row and written under `key`
/// after the row's own columns.
pub struct Formula<R, U, F: Fn(&R) -> U> {
    pub key: String,
    pub formula: F,
    pub underlying: R,
}

impl<R, U, F: Fn(&R) -> U> Formula<R, U, F> {
    pub fn new(key: impl Into<String>, formula: F, underlying: R) -> Self {
        Formula {
            key: key.into(),
            formula,
            underlying,
        }
    }
}

impl<R, U, F> Serialize for Formula<R, U, F>
where
    R: Serialize,
    U: Serialize,
    F: Fn(&R) -> U,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let computed = bridge::<S, _>(&(self.formula)(&self.underlying))?;
        emit_augmented(
            &self.underlying,
            std::iter::once((self.key.as_str(), &computed)),
            serializer,
        )
    }
}

/// A record wrapped with an externally supplied attachment.
///
/// Created by [`Csv::attach`](crate::Csv::attach) (one value per row) or
/// [`Csv::fill`](crate::Csv::fill) (one shared value). The attachment's
/// fields are encoded after the row's own columns.
pub struct AttachValue<R, U> {
    pub given: R,
    pub attached: U,
}

impl<R, U> AttachValue<R, U> {
    pub fn new(given: R, attached: U) -> Self {
        AttachValue { given, attached }
    }
}

impl<R, U> Serialize for AttachValue<R, U>
where
    R: Serialize,
    U: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let attached = match bridge::<S, _>(&self.attached)? {
            Value::Object(fields) => fields,
            _ => {
                return Err(ser::Error::custom(
                    "attached values must have keyed fields to name their columns",
                ))
            }
        };
        emit_augmented(&self.given, attached.iter().map(|(k, v)| (k.as_str(), v)), serializer)
    }
}

/// Flattens `value` through the dynamic bridge, converting this crate's
/// error into the target serializer's.
fn bridge<S, T>(value: &T) -> std::result::Result<Value, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
{
    crate::to_value(value).map_err(|e: Error| ser::Error::custom(e))
}

/// Emits a record's fields followed by extra entries, as one map.
fn emit_augmented<'v, S, T, I>(
    base: &T,
    extra: I,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
    I: Iterator<Item = (&'v str, &'v Value)>,
{
    let fields = match bridge::<S, T>(base)? {
        Value::Object(fields) => fields,
        _ => {
            return Err(ser::Error::custom(
                "augmented rows must have keyed fields",
            ))
        }
    };

    let mut map = serializer.serialize_map(None)?;
    for (key, value) in &fields {
        map.serialize_entry(key, value)?;
    }
    for (key, value) in extra {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_row, to_string, Csv};
    use serde::Serialize;

    #[derive(Serialize)]
    struct R {
        a: i64,
        b: i64,
    }

    #[test]
    fn formula_appends_computed_column() {
        let row = to_row(&Formula::new("sum", |r: &R| r.a + r.b, R { a: 1, b: 2 })).unwrap();
        let keys: Vec<_> = row.keys().collect();
        assert_eq!(keys, vec!["a", "b", "sum"]);
        assert_eq!(row.get("sum"), Some("3"));
    }

    #[test]
    fn attachment_appends_supplied_fields() {
        #[derive(Serialize, Clone)]
        struct Origin {
            source: String,
        }

        let table = Csv::from(vec![R { a: 1, b: 2 }, R { a: 3, b: 4 }]).fill(Origin {
            source: "manual".to_string(),
        });
        assert_eq!(
            to_string(&table).unwrap(),
            "a,b,source\n1,2,manual\n3,4,manual"
        );
    }

    #[test]
    fn colliding_attachment_key_is_a_duplicate() {
        let err = to_row(&Formula::new("a", |r: &R| r.a, R { a: 1, b: 2 })).unwrap_err();
        assert_eq!(err, Error::DuplicateKey { key: "a".into() });
    }

    #[test]
    fn leaf_rows_cannot_be_augmented() {
        let err = to_row(&Formula::new("double", |n: &i64| n * 2, 21i64)).unwrap_err();
        assert!(matches!(err, Error::Message(_)));
    }
}
