//! Parsing and validation for argo.toml configuration files

use crate::context::Context;
use crate::error::ConfigError;
use crate::rules::RuleDefinition;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = "argo.toml";

/// Main configuration struct for argo.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// File metadata
    pub argo: ArgoMeta,

    /// Seed context handed to the rule set
    #[serde(default, deserialize_with = "deserialize_context")]
    pub context: Context,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Rules evaluated after the built-in ones, in file order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDefinition>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.argo.version != "1" {
            return Err(ConfigError::Validation(format!(
                "Unsupported configuration version '{}'. Expected '1'",
                self.argo.version
            )));
        }

        if self.context.iter().any(|(key, _)| key.is_empty()) {
            return Err(ConfigError::Validation(
                "Context keys must not be empty".to_string(),
            ));
        }

        for rule in &self.rules {
            rule.validate().map_err(ConfigError::Validation)?;
        }

        Ok(())
    }
}

/// `[argo]` metadata section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgoMeta {
    /// Configuration version (must be "1")
    pub version: String,
}

/// Output configuration section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Color output setting
    #[serde(default)]
    pub color: ColorOption,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format
    Jsonl,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Auto-detect based on terminal capabilities
    #[default]
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

/// Parses a `key=value` override into a context entry
///
/// The value is read as a TOML value (`5`, `true`, `"text"`, `[1, 2]`);
/// anything that is not valid TOML is kept as a bare string.
pub fn parse_override(raw: &str) -> Result<(String, serde_json::Value), ConfigError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidOverride(raw.to_string()))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::InvalidOverride(raw.to_string()));
    }

    let value = value.trim();
    let parsed = toml::from_str::<toml::Table>(&format!("v = {}", value))
        .ok()
        .and_then(|mut table| table.remove("v"))
        .map(toml_to_json)
        .unwrap_or_else(|| Value::String(value.to_string()));

    Ok((key.to_string(), parsed))
}

/// Converts a TOML value to JSON; datetimes become their TOML text
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn deserialize_context<'de, D>(deserializer: D) -> Result<Context, D::Error>
where
    D: Deserializer<'de>,
{
    let table = toml::Table::deserialize(deserializer)?;
    Ok(table
        .into_iter()
        .map(|(k, v)| (k, toml_to_json(v)))
        .collect())
}
