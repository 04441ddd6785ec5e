//! Contract types for the WOPR config service REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ContractError;

/// Type tag classifying a configuration value.
///
/// The service stores this alongside every row, but clients never trust
/// the stored tag: it is re-derived structurally from the value on every
/// read via [`ValueType::infer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Integer,
    Float,
    Boolean,
    List,
    Dict,
}

impl ValueType {
    /// Infer the type tag from the runtime shape of a JSON value.
    ///
    /// `Null` has no tag of its own and falls back to `String`, matching
    /// the service's classification of values it cannot place. A number
    /// is `Integer` only when it is representable without a fraction;
    /// JSON text `3.0` carries a fraction and infers `Float`.
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Bool(_) => ValueType::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => ValueType::Integer,
            Value::Number(_) => ValueType::Float,
            Value::Array(_) => ValueType::List,
            Value::Object(_) => ValueType::Dict,
            Value::String(_) | Value::Null => ValueType::String,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Boolean => "boolean",
            ValueType::List => "list",
            ValueType::Dict => "dict",
        }
    }

    /// Whether values of this type are edited in place rather than as a
    /// single text field.
    pub fn is_complex(self) -> bool {
        matches!(self, ValueType::List | ValueType::Dict)
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValueType {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ValueType::String),
            "integer" => Ok(ValueType::Integer),
            "float" => Ok(ValueType::Float),
            "boolean" => Ok(ValueType::Boolean),
            "list" => Ok(ValueType::List),
            "dict" => Ok(ValueType::Dict),
            other => Err(ContractError::InvalidValueType(other.to_string())),
        }
    }
}

/// One flattened configuration leaf: a dot-path key plus its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: Value,
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Setting {
    /// Build a setting from a key/value pair, inferring the type tag.
    pub fn from_value(key: impl Into<String>, value: Value) -> Self {
        let value_type = ValueType::infer(&value);
        Setting {
            key: key.into(),
            value,
            value_type,
            description: None,
            environment: default_environment(),
        }
    }

    pub fn is_complex(&self) -> bool {
        self.value_type.is_complex()
    }
}

pub fn default_environment() -> String {
    "default".to_string()
}

/// Body of `PUT /config/set/<key>` — the single idempotent write
/// primitive. The service creates the key when absent and overwrites it
/// when present; there is no separate creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRequest {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    pub updated_by: String,
}

/// Response of `GET /config/get/<key>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigValue {
    pub key: String,
    pub value: Value,
    pub value_type: ValueType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Body of `POST /config/get` — bulk lookup of several keys at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysRequest {
    pub keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub environment: Option<String>,
}

/// Element of the `GET /config/environments` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentEntry {
    pub environment: String,
}

/// One entry of a key's change history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    pub changed_by: Option<String>,
    pub changed_at: DateTime<Utc>,
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Response of `GET /config/export/yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YamlExport {
    pub yaml: String,
    #[serde(default)]
    pub environment: Option<String>,
}

/// Body of `POST /config/import/yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YamlImportRequest {
    pub yaml_content: String,
    pub environment: String,
    pub updated_by: String,
}

/// Response of `POST /config/import/yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YamlImportResponse {
    pub imported: usize,
    pub environment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn infer_covers_every_json_shape() {
        assert_eq!(ValueType::infer(&json!("x")), ValueType::String);
        assert_eq!(ValueType::infer(&json!(3)), ValueType::Integer);
        assert_eq!(ValueType::infer(&json!(3.5)), ValueType::Float);
        assert_eq!(ValueType::infer(&json!(true)), ValueType::Boolean);
        assert_eq!(ValueType::infer(&json!([1, 2])), ValueType::List);
        assert_eq!(ValueType::infer(&json!({"a": 1})), ValueType::Dict);
        assert_eq!(ValueType::infer(&Value::Null), ValueType::String);
    }

    #[test]
    fn fractional_zero_is_a_float() {
        // serde_json keeps "3.0" as f64, so the int/float distinction
        // survives a round-trip through the service.
        let v: Value = serde_json::from_str("3.0").unwrap();
        assert_eq!(ValueType::infer(&v), ValueType::Float);
    }

    #[test]
    fn value_type_tag_round_trip() {
        for tag in ["string", "integer", "float", "boolean", "list", "dict"] {
            let parsed: ValueType = tag.parse().unwrap();
            assert_eq!(parsed.as_str(), tag);
        }
        assert!("timestamp".parse::<ValueType>().is_err());
    }

    #[test]
    fn set_request_serializes_like_the_service_expects() {
        let req = SetRequest {
            value: json!(5),
            description: None,
            updated_by: "woprctl".to_string(),
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, json!({"value": 5, "updated_by": "woprctl"}));
    }

    #[test]
    fn environment_listing_deserializes() {
        let raw = r#"[{"environment":"production"},{"environment":"stage"}]"#;
        let entries: Vec<EnvironmentEntry> = serde_json::from_str(raw).unwrap();
        assert_eq!(entries[0].environment, "production");
        assert_eq!(entries.len(), 2);
    }
}
