//! JSON <-> SQLite value conversion
//!
//! Inbound: payload values become bound parameters.
//! Outbound: result columns become JSON without re-typing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::{Number, Value};

/// Convert a payload value into a bindable SQLite value.
///
/// Arrays and objects are bound as their compact JSON text.
pub fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                SqlValue::Real(f)
            } else {
                // u64 above i64::MAX
                SqlValue::Text(n.to_string())
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

/// Convert a result column into JSON.
pub fn from_sql_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(STANDARD.encode(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_to_sql() {
        assert_eq!(to_sql_value(&json!("hello")), SqlValue::Text("hello".into()));
        assert_eq!(to_sql_value(&json!(42)), SqlValue::Integer(42));
        assert_eq!(to_sql_value(&json!(1.5)), SqlValue::Real(1.5));
        assert_eq!(to_sql_value(&json!(true)), SqlValue::Integer(1));
        assert_eq!(to_sql_value(&Value::Null), SqlValue::Null);
    }

    #[test]
    fn test_nested_values_bind_as_json_text() {
        let value = json!({"nodes": [1, 2]});
        assert_eq!(
            to_sql_value(&value),
            SqlValue::Text("{\"nodes\":[1,2]}".into())
        );
    }

    #[test]
    fn test_columns_to_json() {
        assert_eq!(from_sql_value(ValueRef::Null), Value::Null);
        assert_eq!(from_sql_value(ValueRef::Integer(7)), json!(7));
        assert_eq!(from_sql_value(ValueRef::Real(2.5)), json!(2.5));
        assert_eq!(from_sql_value(ValueRef::Text(b"abc")), json!("abc"));
        assert_eq!(from_sql_value(ValueRef::Blob(&[1, 2, 3])), json!("AQID"));
        assert_eq!(from_sql_value(ValueRef::Real(f64::NAN)), Value::Null);
    }
}
