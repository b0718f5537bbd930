//! SQL values exchanged with the Data API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::errors::ConnectorError;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
    Blob(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    /// Timestamps are carried without a zone; the Data API works in UTC.
    Timestamp(NaiveDateTime),
    /// Kept as text so no precision is lost.
    Decimal(String),
    Uuid(Uuid),
    Json(serde_json::Value),
    Array(Vec<Value>),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in conversion errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Blob(_) => "blob",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp(_) => "timestamp",
            Value::Decimal(_) => "decimal",
            Value::Uuid(_) => "uuid",
            Value::Json(_) => "json",
            Value::Array(_) => "array",
        }
    }

    /// Renders the value as JSON. Blobs become base64 and temporals ISO-8601 strings.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => json!(b),
            Value::Long(n) => json!(n),
            Value::Double(d) => json!(d),
            Value::String(s) | Value::Decimal(s) => json!(s),
            Value::Blob(bytes) => json!(BASE64.encode(bytes)),
            Value::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
            Value::Time(t) => json!(t.format("%H:%M:%S%.f").to_string()),
            Value::Timestamp(ts) => json!(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            Value::Uuid(u) => json!(u.to_string()),
            Value::Json(v) => v.clone(),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i64 => Long,
    i32 => Long,
    i16 => Long,
    u32 => Long,
    f64 => Double,
    f32 => Double,
    String => String,
    &str => String,
    Vec<u8> => Blob,
    &[u8] => Blob,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => Timestamp,
    Uuid => Uuid,
    serde_json::Value => Json,
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v.naive_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Typed extraction from a [`Value`].
pub trait FromValue: Sized {
    /// # Errors
    ///
    /// Returns [`ConnectorError::Conversion`] when the value has the wrong kind.
    fn from_value(value: &Value) -> Result<Self, ConnectorError>;
}

fn mismatch<T>(expected: &str, value: &Value) -> Result<T, ConnectorError> {
    Err(ConnectorError::Conversion(format!(
        "expected {expected}, found {}",
        value.kind()
    )))
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        match value {
            Value::Bool(b) => Ok(*b),
            // MySQL reports BOOLEAN columns as TINYINT
            Value::Long(n) => Ok(*n != 0),
            other => mismatch("bool", other),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        match value {
            Value::Long(n) => Ok(*n),
            other => mismatch("long", other),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        let n = i64::from_value(value)?;
        i32::try_from(n).map_err(|_| ConnectorError::Conversion(format!("{n} overflows i32")))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        match value {
            Value::Double(d) => Ok(*d),
            #[allow(clippy::cast_precision_loss)]
            Value::Long(n) => Ok(*n as f64),
            Value::Decimal(s) => s
                .parse()
                .map_err(|_| ConnectorError::Conversion(format!("invalid decimal {s:?}"))),
            other => mismatch("double", other),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        match value {
            Value::String(s) | Value::Decimal(s) => Ok(s.clone()),
            Value::Uuid(u) => Ok(u.to_string()),
            other => mismatch("string", other),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        match value {
            Value::Blob(bytes) => Ok(bytes.clone()),
            other => mismatch("blob", other),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        match value {
            Value::Date(d) => Ok(*d),
            other => mismatch("date", other),
        }
    }
}

impl FromValue for NaiveTime {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        match value {
            Value::Time(t) => Ok(*t),
            other => mismatch("time", other),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            other => mismatch("timestamp", other),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        NaiveDateTime::from_value(value).map(|ts| ts.and_utc())
    }
}

impl FromValue for Uuid {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        match value {
            Value::Uuid(u) => Ok(*u),
            Value::String(s) => Ok(Uuid::parse_str(s)?),
            other => mismatch("uuid", other),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: &Value) -> Result<Self, ConnectorError> {
        match value {
            Value::Json(v) => Ok(v.clone()),
            Value::String(s) => Ok(serde_json::from_str(s)?),
            other => mismatch("json", other),
        }
    }
}
