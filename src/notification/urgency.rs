//! Urgency levels for desktop notifications
//!
//! Mirrors the three levels the freedesktop notification spec (and libnotify)
//! understands. The level comes from the `urgency` key of a plugin config;
//! anything other than `low`, `normal` or `critical` is rejected instead of
//! being coerced.

use std::str::FromStr;

use super::error::ConfigError;

/// Urgency level for notifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    Critical,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Urgency {
    /// Value accepted by `notify-send --urgency`
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::Critical => "critical",
        }
    }
}

impl FromStr for Urgency {
    type Err = ConfigError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "normal" => Ok(Urgency::Normal),
            "critical" => Ok(Urgency::Critical),
            _ => Err(ConfigError::InvalidUrgency(s.to_string())),
        }
    }
}
