//! Typed variable values.
//!
//! The aircraft-systems interface returns loosely typed dataref values. They are
//! converted into [`DataValue`] at the bus boundary and never travel further
//! as raw JSON.

use std::fmt;

use serde_json::Value;

use super::error::BusError;

/// A dataref value as exposed by the aircraft-systems interface.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl DataValue {
    /// Name of the variant, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Bool(_) => "bool",
            DataValue::Int(_) => "int",
            DataValue::Float(_) => "float",
            DataValue::String(_) => "string",
        }
    }

    /// Coerce to a boolean.
    ///
    /// Numbers are true when non-zero. Strings accept `true`/`false`/`1`/`0`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            DataValue::Int(i) => Some(*i != 0),
            DataValue::Float(f) => Some(*f != 0.0),
            DataValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
        }
    }

    /// Coerce to an integer. Floats are truncated toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Bool(b) => Some(i64::from(*b)),
            DataValue::Int(i) => Some(*i),
            DataValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            DataValue::Float(_) => None,
            DataValue::String(s) => s.trim().parse().ok(),
        }
    }

    /// Coerce to a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            DataValue::Int(i) => Some(*i as f64),
            DataValue::Float(f) => Some(*f),
            DataValue::String(s) => s.trim().parse().ok(),
        }
    }

    /// Borrow the string payload. Only the `String` variant qualifies.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Decode a JSON value received from a bridge.
    ///
    /// Arrays, objects and null are rejected.
    pub fn from_json(name: &str, value: &Value) -> Result<Self, BusError> {
        match value {
            Value::Bool(b) => Ok(DataValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(DataValue::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(DataValue::Float(f))
                } else {
                    Err(BusError::TypeMismatch {
                        name: name.to_string(),
                        expected: "number",
                        found: n.to_string(),
                    })
                }
            }
            Value::String(s) => Ok(DataValue::String(s.clone())),
            other => Err(BusError::TypeMismatch {
                name: name.to_string(),
                expected: "bool, number or string",
                found: json_kind(other).to_string(),
            }),
        }
    }

    /// Encode for a bridge write.
    pub fn to_json(&self) -> Value {
        match self {
            DataValue::Bool(b) => Value::Bool(*b),
            DataValue::Int(i) => Value::from(*i),
            DataValue::Float(f) => Value::from(*f),
            DataValue::String(s) => Value::String(s.clone()),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Int(i) => write!(f, "{}", i),
            DataValue::Float(v) => write!(f, "{}", v),
            DataValue::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Bool(v)
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int(v)
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        DataValue::Int(i64::from(v))
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Float(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::String(v.to_string())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bool_coercion() {
        assert_eq!(DataValue::Int(1).as_bool(), Some(true));
        assert_eq!(DataValue::Float(0.0).as_bool(), Some(false));
        assert_eq!(DataValue::from("TRUE").as_bool(), Some(true));
        assert_eq!(DataValue::from("maybe").as_bool(), None);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(DataValue::Float(17.9).as_i64(), Some(17));
        assert_eq!(DataValue::Float(f64::NAN).as_i64(), None);
        assert_eq!(DataValue::from(" 42 ").as_f64(), Some(42.0));
        assert_eq!(DataValue::Bool(true).as_f64(), Some(1.0));
    }

    #[test]
    fn test_string_accessor_only_for_strings() {
        assert_eq!(DataValue::from("KLM1234").as_str(), Some("KLM1234"));
        assert_eq!(DataValue::Int(3).as_str(), None);
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(
            DataValue::from_json("a", &json!(true)).unwrap(),
            DataValue::Bool(true)
        );
        assert_eq!(
            DataValue::from_json("a", &json!(12)).unwrap(),
            DataValue::Int(12)
        );
        assert_eq!(
            DataValue::from_json("a", &json!(12.5)).unwrap(),
            DataValue::Float(12.5)
        );
        assert_eq!(
            DataValue::from_json("a", &json!("x")).unwrap(),
            DataValue::from("x")
        );
    }

    #[test]
    fn test_from_json_rejects_arrays() {
        let err = DataValue::from_json("aircraft.tanks", &json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("aircraft.tanks"));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_display() {
        assert_eq!(DataValue::from("EDDF").to_string(), "\"EDDF\"");
        assert_eq!(DataValue::Float(1.5).to_string(), "1.5");
    }
}
