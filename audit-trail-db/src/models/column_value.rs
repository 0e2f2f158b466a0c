use audit_trail_api::BoxError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// A single cell value as reported by the change tracker.
///
/// `Null` stands for a missing value; all other variants carry the raw value.
/// Serializes to the natural JSON representation of the value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Json(serde_json::Value),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Converts the value into a Rust type.
    pub fn try_into_value<T: FromColumnValue>(&self) -> Result<T, BoxError> {
        T::from_column_value(self)
    }

    fn kind(&self) -> &'static str {
        match self {
            ColumnValue::Null => "Null",
            ColumnValue::Bool(_) => "Bool",
            ColumnValue::Int(_) => "Int",
            ColumnValue::Decimal(_) => "Decimal",
            ColumnValue::Text(_) => "Text",
            ColumnValue::Uuid(_) => "Uuid",
            ColumnValue::Timestamp(_) => "Timestamp",
            ColumnValue::Date(_) => "Date",
            ColumnValue::Json(_) => "Json",
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Null => write!(f, "null"),
            ColumnValue::Bool(b) => write!(f, "{b}"),
            ColumnValue::Int(i) => write!(f, "{i}"),
            ColumnValue::Decimal(d) => write!(f, "{d}"),
            ColumnValue::Text(s) => write!(f, "{s}"),
            ColumnValue::Uuid(u) => write!(f, "{u}"),
            ColumnValue::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            ColumnValue::Date(d) => write!(f, "{d}"),
            ColumnValue::Json(v) => write!(f, "{v}"),
        }
    }
}

/// Conversion from a [`ColumnValue`] back into a Rust value.
pub trait FromColumnValue: Sized {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError>;
}

fn mismatch(expected: &str, value: &ColumnValue) -> BoxError {
    format!("Expected a {expected} value, found {}", value.kind()).into()
}

impl<T: FromColumnValue> FromColumnValue for Option<T> {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_column_value(value).map(Some)
        }
    }
}

impl FromColumnValue for bool {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError> {
        match value {
            ColumnValue::Bool(b) => Ok(*b),
            other => Err(mismatch("Bool", other)),
        }
    }
}

impl FromColumnValue for i64 {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError> {
        match value {
            ColumnValue::Int(i) => Ok(*i),
            other => Err(mismatch("Int", other)),
        }
    }
}

impl FromColumnValue for i32 {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError> {
        let wide = i64::from_column_value(value)?;
        i32::try_from(wide).map_err(|_| format!("Value {wide} does not fit in i32").into())
    }
}

impl FromColumnValue for u32 {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError> {
        let wide = i64::from_column_value(value)?;
        u32::try_from(wide).map_err(|_| format!("Value {wide} does not fit in u32").into())
    }
}

impl FromColumnValue for Decimal {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError> {
        match value {
            ColumnValue::Decimal(d) => Ok(*d),
            ColumnValue::Int(i) => Ok(Decimal::from(*i)),
            other => Err(mismatch("Decimal", other)),
        }
    }
}

impl FromColumnValue for String {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError> {
        match value {
            ColumnValue::Text(s) => Ok(s.clone()),
            other => Err(mismatch("Text", other)),
        }
    }
}

impl FromColumnValue for Uuid {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError> {
        match value {
            ColumnValue::Uuid(u) => Ok(*u),
            other => Err(mismatch("Uuid", other)),
        }
    }
}

impl FromColumnValue for DateTime<Utc> {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError> {
        match value {
            ColumnValue::Timestamp(t) => Ok(*t),
            other => Err(mismatch("Timestamp", other)),
        }
    }
}

impl FromColumnValue for NaiveDate {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError> {
        match value {
            ColumnValue::Date(d) => Ok(*d),
            other => Err(mismatch("Date", other)),
        }
    }
}

impl FromColumnValue for serde_json::Value {
    fn from_column_value(value: &ColumnValue) -> Result<Self, BoxError> {
        match value {
            ColumnValue::Json(v) => Ok(v.clone()),
            ColumnValue::Null => Ok(serde_json::Value::Null),
            other => Err(mismatch("Json", other)),
        }
    }
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        ColumnValue::Bool(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Int(value)
    }
}

impl From<i32> for ColumnValue {
    fn from(value: i32) -> Self {
        ColumnValue::Int(value.into())
    }
}

impl From<u32> for ColumnValue {
    fn from(value: u32) -> Self {
        ColumnValue::Int(value.into())
    }
}

impl From<Decimal> for ColumnValue {
    fn from(value: Decimal) -> Self {
        ColumnValue::Decimal(value)
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Text(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Text(value.to_string())
    }
}

impl From<Uuid> for ColumnValue {
    fn from(value: Uuid) -> Self {
        ColumnValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for ColumnValue {
    fn from(value: DateTime<Utc>) -> Self {
        ColumnValue::Timestamp(value)
    }
}

impl From<NaiveDate> for ColumnValue {
    fn from(value: NaiveDate) -> Self {
        ColumnValue::Date(value)
    }
}

impl From<serde_json::Value> for ColumnValue {
    fn from(value: serde_json::Value) -> Self {
        ColumnValue::Json(value)
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ColumnValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_renders_plain_values() {
        assert_eq!(ColumnValue::from(5).to_string(), "5");
        assert_eq!(ColumnValue::from("x").to_string(), "x");
        assert_eq!(ColumnValue::Null.to_string(), "null");
        assert_eq!(ColumnValue::from(Decimal::new(105, 2)).to_string(), "1.05");
    }

    #[test]
    fn test_serialize_is_untagged() {
        let values = vec![
            ColumnValue::Null,
            ColumnValue::from(7),
            ColumnValue::from("abc"),
            ColumnValue::from(true),
        ];

        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            json!([null, 7, "abc", true])
        );
    }

    #[test]
    fn test_optional_conversions() {
        let missing: Option<i64> = None;
        assert!(ColumnValue::from(missing).is_null());
        assert_eq!(ColumnValue::from(Some(3)), ColumnValue::Int(3));

        let value: Option<String> = ColumnValue::Null.try_into_value().unwrap();
        assert_eq!(value, None);

        let value: Option<String> = ColumnValue::from("a").try_into_value().unwrap();
        assert_eq!(value.as_deref(), Some("a"));
    }

    #[test]
    fn test_mismatched_conversion_fails() {
        let result: Result<i64, _> = ColumnValue::from("not a number").try_into_value();
        assert!(result.is_err());

        let result: Result<i32, _> = ColumnValue::Int(i64::MAX).try_into_value();
        assert!(result.is_err());
    }
}
