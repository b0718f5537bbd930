//! Named statement parameters and their Data API encoding.

use aws_sdk_rdsdata::primitives::Blob;
use aws_sdk_rdsdata::types::{ArrayValue, Field, SqlParameter, TypeHint};
use chrono::SubsecRound;

use super::value::Value;
use crate::errors::ConnectorError;

/// Ordered named parameters for a statement.
///
/// Names may be written with or without the leading `:` used in the SQL text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `name`, replacing an earlier binding of the same name.
    #[must_use]
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: &str, value: impl Into<Value>) {
        let name = normalize_name(name);
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        let name = normalize_name(name);
        self.entries
            .iter()
            .find_map(|(n, v)| (*n == name).then_some(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// # Errors
    ///
    /// Returns an error if a name is empty or a value cannot be encoded.
    pub fn to_sql_parameters(&self) -> Result<Vec<SqlParameter>, ConnectorError> {
        self.entries
            .iter()
            .map(|(name, value)| to_sql_parameter(name, value))
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.push(k.as_ref(), v);
        }
        params
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().trim_start_matches(':').to_string()
}

// Neither engine stores more than microseconds; values are truncated before
// formatting so `%.f` never emits nanoseconds.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Encodes a single named value, attaching a type hint where the Data API needs one.
///
/// # Errors
///
/// Returns an error if `name` is empty or the value is an unsupported array.
pub fn to_sql_parameter(name: &str, value: &Value) -> Result<SqlParameter, ConnectorError> {
    if name.is_empty() {
        return Err(ConnectorError::Parameter("parameter name is empty".into()));
    }

    let (field, hint) = encode(name, value)?;
    Ok(SqlParameter::builder()
        .name(name)
        .value(field)
        .set_type_hint(hint)
        .build())
}

fn encode(name: &str, value: &Value) -> Result<(Field, Option<TypeHint>), ConnectorError> {
    let encoded = match value {
        Value::Null => (Field::IsNull(true), None),
        Value::Bool(b) => (Field::BooleanValue(*b), None),
        Value::Long(n) => (Field::LongValue(*n), None),
        Value::Double(d) => (Field::DoubleValue(*d), None),
        Value::String(s) => (Field::StringValue(s.clone()), None),
        Value::Blob(bytes) => (Field::BlobValue(Blob::new(bytes.clone())), None),
        Value::Date(d) => (
            Field::StringValue(d.format(DATE_FORMAT).to_string()),
            Some(TypeHint::Date),
        ),
        Value::Time(t) => (
            Field::StringValue(t.trunc_subsecs(6).format(TIME_FORMAT).to_string()),
            Some(TypeHint::Time),
        ),
        Value::Timestamp(ts) => (
            Field::StringValue(ts.trunc_subsecs(6).format(TIMESTAMP_FORMAT).to_string()),
            Some(TypeHint::Timestamp),
        ),
        Value::Decimal(s) => (Field::StringValue(s.clone()), Some(TypeHint::Decimal)),
        Value::Uuid(u) => (Field::StringValue(u.to_string()), Some(TypeHint::Uuid)),
        Value::Json(v) => (
            Field::StringValue(serde_json::to_string(v)?),
            Some(TypeHint::Json),
        ),
        Value::Array(items) => (Field::ArrayValue(encode_array(name, items)?), None),
    };
    Ok(encoded)
}

// Array parameters must be homogeneous scalars or nested arrays. Null
// elements are allowed anywhere and the first non-null element picks the kind.
fn encode_array(name: &str, items: &[Value]) -> Result<ArrayValue, ConnectorError> {
    let unsupported = |kind: &str| {
        ConnectorError::Parameter(format!(
            "{name}: arrays must hold one scalar kind, found {kind}"
        ))
    };

    macro_rules! collect {
        ($variant:ident, $pat:pat => $out:expr) => {
            items
                .iter()
                .map(|item| match item {
                    Value::Null => Ok(None),
                    $pat => Ok(Some($out)),
                    other => Err(unsupported(other.kind())),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ArrayValue::$variant)
        };
    }

    match items.iter().find(|item| !item.is_null()) {
        None | Some(Value::String(_)) => collect!(StringValues, Value::String(s) => s.clone()),
        Some(Value::Bool(_)) => collect!(BooleanValues, Value::Bool(b) => *b),
        Some(Value::Long(_)) => collect!(LongValues, Value::Long(n) => *n),
        Some(Value::Double(_)) => collect!(DoubleValues, Value::Double(d) => *d),
        Some(Value::Array(_)) => items
            .iter()
            .map(|item| match item {
                Value::Null => Ok(None),
                Value::Array(inner) => encode_array(name, inner).map(Some),
                other => Err(unsupported(other.kind())),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ArrayValue::ArrayValues),
        Some(other) => Err(unsupported(other.kind())),
    }
}
