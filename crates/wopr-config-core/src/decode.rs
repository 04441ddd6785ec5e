// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Decoding textual edits into JSON values
//!
//! Every edit arrives at the UI boundary as text. The [`ValueType`] of
//! the setting being edited decides how that text becomes a JSON value;
//! a decode failure is a local validation error and must abort the write
//! before any request is issued.

use serde_json::Value;
use thiserror::Error;
use wopr_config_model::ValueType;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not a valid integer: {0:?}")]
    InvalidInteger(String),

    #[error("not a valid float: {0:?}")]
    InvalidFloat(String),

    #[error("not a valid JSON {expected} literal: {source}")]
    Malformed {
        expected: ValueType,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a JSON {expected} literal")]
    WrongShape { expected: ValueType },
}

/// Decode raw edit text according to the target value type.
///
/// Booleans are a lossy but total decode: case-insensitive `"true"` is
/// true, every other input is false. All other non-string types can fail
/// validation.
pub fn decode_raw(raw: &str, value_type: ValueType) -> Result<Value, DecodeError> {
    match value_type {
        ValueType::String => Ok(Value::String(raw.to_string())),
        ValueType::Boolean => Ok(Value::Bool(raw.trim().eq_ignore_ascii_case("true"))),
        ValueType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| DecodeError::InvalidInteger(raw.to_string())),
        ValueType::Float => {
            let parsed = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| DecodeError::InvalidFloat(raw.to_string()))?;
            // NaN/inf parse as f64 but are not JSON-representable
            serde_json::Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| DecodeError::InvalidFloat(raw.to_string()))
        }
        ValueType::List => {
            let parsed = parse_literal(raw, ValueType::List)?;
            if parsed.is_array() {
                Ok(parsed)
            } else {
                Err(DecodeError::WrongShape {
                    expected: ValueType::List,
                })
            }
        }
        ValueType::Dict => {
            let parsed = parse_literal(raw, ValueType::Dict)?;
            if parsed.is_object() {
                Ok(parsed)
            } else {
                Err(DecodeError::WrongShape {
                    expected: ValueType::Dict,
                })
            }
        }
    }
}

fn parse_literal(raw: &str, expected: ValueType) -> Result<Value, DecodeError> {
    serde_json::from_str(raw).map_err(|source| DecodeError::Malformed { expected, source })
}

/// Lenient decode used for nested item and property edits: JSON when the
/// text parses, the literal string otherwise.
pub fn decode_lenient(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Canonical textual form of a value for editing and display. Strings
/// appear bare; complex values as compact JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_decode_is_strict() {
        assert_eq!(decode_raw("5", ValueType::Integer).unwrap(), json!(5));
        assert_eq!(decode_raw(" -12 ", ValueType::Integer).unwrap(), json!(-12));
        assert!(decode_raw("abc", ValueType::Integer).is_err());
        assert!(decode_raw("5.7", ValueType::Integer).is_err());
        assert!(decode_raw("", ValueType::Integer).is_err());
    }

    #[test]
    fn float_decode_rejects_non_finite() {
        assert_eq!(decode_raw("0.75", ValueType::Float).unwrap(), json!(0.75));
        assert!(decode_raw("NaN", ValueType::Float).is_err());
        assert!(decode_raw("inf", ValueType::Float).is_err());
        assert!(decode_raw("three", ValueType::Float).is_err());
    }

    #[test]
    fn boolean_decode_is_total() {
        assert_eq!(decode_raw("true", ValueType::Boolean).unwrap(), json!(true));
        assert_eq!(decode_raw("TRUE", ValueType::Boolean).unwrap(), json!(true));
        assert_eq!(decode_raw("false", ValueType::Boolean).unwrap(), json!(false));
        assert_eq!(decode_raw("no", ValueType::Boolean).unwrap(), json!(false));
        assert_eq!(decode_raw("1", ValueType::Boolean).unwrap(), json!(false));
        assert_eq!(decode_raw("", ValueType::Boolean).unwrap(), json!(false));
    }

    #[test]
    fn container_decode_checks_shape() {
        assert_eq!(
            decode_raw(r#"["a", 1]"#, ValueType::List).unwrap(),
            json!(["a", 1])
        );
        assert!(matches!(
            decode_raw(r#"{"a": 1}"#, ValueType::List),
            Err(DecodeError::WrongShape { .. })
        ));
        assert!(matches!(
            decode_raw("[1, 2", ValueType::List),
            Err(DecodeError::Malformed { .. })
        ));
        assert_eq!(
            decode_raw(r#"{"a": 1}"#, ValueType::Dict).unwrap(),
            json!({"a": 1})
        );
    }

    #[test]
    fn lenient_decode_falls_back_to_string() {
        assert_eq!(decode_lenient("42"), json!(42));
        assert_eq!(decode_lenient(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(decode_lenient("not json"), json!("not json"));
        assert_eq!(decode_lenient(""), json!(""));
    }

    #[test]
    fn strings_format_bare_and_complex_as_json() {
        assert_eq!(format_value(&json!("hello")), "hello");
        assert_eq!(format_value(&json!(3.5)), "3.5");
        assert_eq!(format_value(&json!([1, "x"])), r#"[1,"x"]"#);
        assert_eq!(format_value(&Value::Null), "null");
    }
}
