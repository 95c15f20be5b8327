//! Record access capability and resolved record values.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Read access to one record.
///
/// Path resolution tries [`RecordAccess::read_member`] first and falls back to
/// [`RecordAccess::read_key`] for every segment.
pub trait RecordAccess {
    /// Attribute-style read of a named member.
    fn read_member(&self, name: &str) -> Option<EnumRecordValue>;

    /// Keyed/indexed read.
    fn read_key(&self, key: &str) -> Option<EnumRecordValue> {
        let _ = key;
        None
    }
}

/// Value read from a record.
#[derive(Clone, Default)]
pub enum EnumRecordValue {
    /// Absent value.
    #[default]
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Number(f64),
    /// Text value.
    String(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Date with time-of-day.
    DateTime(NaiveDateTime),
    /// Keyed mapping.
    Map(BTreeMap<String, EnumRecordValue>),
    /// Indexed sequence.
    List(Vec<EnumRecordValue>),
    /// Nested record exposing its own members.
    Object(Rc<dyn RecordAccess>),
}

impl EnumRecordValue {
    /// Whether the value is absent.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Wrap a nested record.
    pub fn object(record: impl RecordAccess + 'static) -> Self {
        Self::Object(Rc::new(record))
    }

    /// Convert a JSON document into a record value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(val) => Self::Boolean(*val),
            Value::Number(val) => match val.as_i64() {
                Some(n) => Self::Integer(n),
                None => val.as_f64().map_or(Self::Null, Self::Number),
            },
            Value::String(val) => Self::String(val.clone()),
            Value::Array(l_values) => Self::List(l_values.iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(key, val)| (key.clone(), Self::from_json(val)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Debug for EnumRecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Boolean(val) => f.debug_tuple("Boolean").field(val).finish(),
            Self::Integer(val) => f.debug_tuple("Integer").field(val).finish(),
            Self::Number(val) => f.debug_tuple("Number").field(val).finish(),
            Self::String(val) => f.debug_tuple("String").field(val).finish(),
            Self::Date(val) => f.debug_tuple("Date").field(val).finish(),
            Self::DateTime(val) => f.debug_tuple("DateTime").field(val).finish(),
            Self::Map(val) => f.debug_tuple("Map").field(val).finish(),
            Self::List(val) => f.debug_tuple("List").field(val).finish(),
            Self::Object(_) => write!(f, "Object(..)"),
        }
    }
}

impl PartialEq for EnumRecordValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Integer(a), Self::Number(b)) | (Self::Number(b), Self::Integer(a)) => {
                *a as f64 == *b
            }
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl RecordAccess for EnumRecordValue {
    fn read_member(&self, name: &str) -> Option<EnumRecordValue> {
        match self {
            Self::Object(record) => record.read_member(name),
            _ => None,
        }
    }

    fn read_key(&self, key: &str) -> Option<EnumRecordValue> {
        match self {
            Self::Map(map) => map.get(key).cloned(),
            Self::List(l_values) => key
                .parse::<usize>()
                .ok()
                .and_then(|n_idx| l_values.get(n_idx).cloned()),
            Self::Object(record) => record.read_key(key),
            _ => None,
        }
    }
}

impl RecordAccess for BTreeMap<String, EnumRecordValue> {
    fn read_member(&self, _name: &str) -> Option<EnumRecordValue> {
        None
    }

    fn read_key(&self, key: &str) -> Option<EnumRecordValue> {
        self.get(key).cloned()
    }
}

impl From<bool> for EnumRecordValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for EnumRecordValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for EnumRecordValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for EnumRecordValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for EnumRecordValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnumRecordValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<NaiveDate> for EnumRecordValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for EnumRecordValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<EnumRecordValue>> From<Option<T>> for EnumRecordValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
