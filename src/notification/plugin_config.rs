//! Per-route plugin settings
//!
//! | key       | type   | consumer        |
//! |-----------|--------|-----------------|
//! | `icon`    | string | parser + runner |
//! | `urgency` | string | runner          |
//!
//! Unknown keys are ignored so configs written for newer plugins keep working.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ConfigError;
use super::icon::Icon;
use super::urgency::Urgency;

pub const ICON_KEY: &str = "icon";
pub const URGENCY_KEY: &str = "urgency";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginConfig(Map<String, Value>);

impl PluginConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// `icon` override, if any.
    pub fn icon(&self) -> Result<Option<Icon>, ConfigError> {
        match self.0.get(ICON_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(Icon::parse(s))),
            Some(_) => Err(ConfigError::InvalidValue {
                key: ICON_KEY.to_string(),
                expected: "a string path or icon name",
            }),
        }
    }

    /// Configured urgency, `normal` when the key is missing.
    pub fn urgency(&self) -> Result<Urgency, ConfigError> {
        match self.0.get(URGENCY_KEY) {
            None | Some(Value::Null) => Ok(Urgency::default()),
            Some(Value::String(s)) => s.parse(),
            Some(_) => Err(ConfigError::InvalidValue {
                key: URGENCY_KEY.to_string(),
                expected: "one of \"low\", \"normal\", \"critical\"",
            }),
        }
    }
}

/// Urgency for an optional config.
pub fn resolve_urgency(config: Option<&PluginConfig>) -> Result<Urgency, ConfigError> {
    config.map_or(Ok(Urgency::default()), PluginConfig::urgency)
}

/// Icon override for an optional config.
pub fn resolve_icon(config: Option<&PluginConfig>) -> Result<Option<Icon>, ConfigError> {
    config.map_or(Ok(None), PluginConfig::icon)
}
