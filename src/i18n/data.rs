//! Structured-data parsing into the canonical dictionary value.
//!
//! Every format is converted to a `serde_json::Value` whose mapping keys
//! are strings. YAML allows non-string keys (`1: one`, `true: yes`); they
//! are stringified here so lookups only ever deal with one key form.

use serde_json::{Map, Number, Value};
use std::path::Path;

use super::DataError;

/// Supported structured-data formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Yaml,
    Toml,
    Json,
}

impl DataFormat {
    /// Extensions probed for a base dictionary, in priority order.
    pub const EXTENSIONS: &[&str] = &["yml", "yaml", "toml", "json"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Parse `content` as `format`.
///
/// Blank content yields `Value::Null`.
pub fn parse(content: &str, format: DataFormat) -> Result<Value, DataError> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }

    match format {
        DataFormat::Yaml => {
            let value: serde_yaml::Value = serde_yaml::from_str(content)?;
            Ok(from_yaml(value))
        }
        DataFormat::Toml => {
            let value: toml::Value = toml::from_str(content)?;
            Ok(from_toml(value))
        }
        DataFormat::Json => Ok(serde_json::from_str(content)?),
    }
}

/// Convert a YAML value, stringifying non-string mapping keys.
pub fn from_yaml(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => yaml_number(&n),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(from_yaml).collect()),
        Yaml::Mapping(mapping) => {
            let map: Map<String, Value> = mapping
                .into_iter()
                .map(|(k, v)| (yaml_key(k), from_yaml(v)))
                .collect();
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => from_yaml(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Convert a TOML value; datetimes become strings.
pub fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, from_toml(v))).collect())
        }
    }
}
