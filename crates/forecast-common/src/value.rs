//! Scalar values returned by the warehouse.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

/// A single cell of a result set.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<Value>),
    /// Nested record, fields kept in schema order.
    Record(Vec<(String, Value)>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Replace NaN and infinite floats with `Null`, recursing into arrays
    /// and records.
    pub fn normalized(self) -> Value {
        match self {
            Value::Float(v) if !v.is_finite() => Value::Null,
            Value::Array(items) => Value::Array(items.into_iter().map(Value::normalized).collect()),
            Value::Record(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, value.normalized()))
                    .collect(),
            ),
            other => other,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Total ordering used when sorting result rows.
    ///
    /// Nulls and NaN sort after every other value; values of different kinds
    /// are grouped by kind.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self.sort_key(), other.sort_key()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp_with(&b),
        }
    }

    fn sort_key(&self) -> Option<SortKey<'_>> {
        match self {
            Value::Null => None,
            Value::Float(v) if v.is_nan() => None,
            Value::Bool(b) => Some(SortKey::Bool(*b)),
            Value::Integer(v) => Some(SortKey::Number(*v as f64)),
            Value::Float(v) => Some(SortKey::Number(*v)),
            Value::Timestamp(t) => Some(SortKey::Timestamp(*t)),
            Value::Text(s) => Some(SortKey::Text(s)),
            Value::Array(_) | Value::Record(_) => Some(SortKey::Opaque),
        }
    }
}

enum SortKey<'a> {
    Bool(bool),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Text(&'a str),
    Opaque,
}

impl SortKey<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Bool(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Timestamp(_) => 2,
            SortKey::Text(_) => 3,
            SortKey::Opaque => 4,
        }
    }

    fn cmp_with(&self, other: &SortKey<'_>) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Value::Float(_) => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Timestamp(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, false))
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalized_replaces_nan() {
        assert_eq!(Value::Float(f64::NAN).normalized(), Value::Null);
        assert_eq!(Value::Float(f64::INFINITY).normalized(), Value::Null);
        assert_eq!(Value::Float(1.5).normalized(), Value::Float(1.5));
    }

    #[test]
    fn test_normalized_recurses() {
        let value = Value::Record(vec![
            ("a".to_string(), Value::Float(f64::NAN)),
            ("b".to_string(), Value::Array(vec![Value::Float(f64::NEG_INFINITY)])),
        ]);

        assert_eq!(
            value.normalized(),
            Value::Record(vec![
                ("a".to_string(), Value::Null),
                ("b".to_string(), Value::Array(vec![Value::Null])),
            ])
        );
    }

    #[test]
    fn test_sort_cmp_nulls_last() {
        assert_eq!(Value::Null.sort_cmp(&Value::Integer(1)), Ordering::Greater);
        assert_eq!(Value::Integer(1).sort_cmp(&Value::Null), Ordering::Less);
        assert_eq!(Value::Float(f64::NAN).sort_cmp(&Value::Null), Ordering::Equal);
    }

    #[test]
    fn test_sort_cmp_mixed_numbers() {
        assert_eq!(Value::Integer(2).sort_cmp(&Value::Float(1.5)), Ordering::Greater);
        assert_eq!(Value::Float(-1.0).sort_cmp(&Value::Integer(0)), Ordering::Less);
    }

    #[test]
    fn test_serialize_timestamp_with_offset() {
        let t = Utc.with_ymd_and_hms(2023, 4, 18, 6, 0, 0).unwrap();
        let json = serde_json::to_string(&Value::Timestamp(t)).unwrap();
        assert_eq!(json, "\"2023-04-18T06:00:00+00:00\"");
    }

    #[test]
    fn test_serialize_non_finite_as_null() {
        let json = serde_json::to_string(&Value::Float(f64::NAN)).unwrap();
        assert_eq!(json, "null");
    }

    #[test]
    fn test_serialize_record_keeps_field_order() {
        let value = Value::Record(vec![
            ("z".to_string(), Value::Integer(1)),
            ("a".to_string(), Value::Text("x".to_string())),
        ]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"z":1,"a":"x"}"#);
    }
}
