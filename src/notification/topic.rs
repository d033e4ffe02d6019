//! Topic filter matching with MQTT wildcards.
//!
//! - `+` matches exactly one level
//! - `#` matches any number of remaining levels, including none; only valid
//!   as the last level

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFilter {
    raw: String,
}

impl TopicFilter {
    /// Validate and build a filter.
    pub fn new(filter: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = filter.into();
        if let Some(reason) = validate_filter(&raw) {
            return Err(ConfigError::InvalidValue {
                key: format!("topic {:?}", raw),
                expected: reason,
            });
        }
        Ok(Self { raw })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, topic: &str) -> bool {
        let filter_levels: Vec<&str> = self.raw.split('/').collect();
        let topic_levels: Vec<&str> = topic.split('/').collect();
        matches_levels(&filter_levels, &topic_levels)
    }
}

fn matches_levels(filter: &[&str], topic: &[&str]) -> bool {
    let mut fi = 0;
    let mut ti = 0;

    while fi < filter.len() {
        match filter[fi] {
            // `sport/#` also matches `sport`
            "#" => return true,
            "+" => {
                if ti >= topic.len() {
                    return false;
                }
            }
            level => {
                if ti >= topic.len() || topic[ti] != level {
                    return false;
                }
            }
        }
        fi += 1;
        ti += 1;
    }

    ti == topic.len()
}

/// Returns why `filter` is invalid, or `None`.
fn validate_filter(filter: &str) -> Option<&'static str> {
    if filter.is_empty() {
        return Some("a non-empty topic filter");
    }

    let levels: Vec<&str> = filter.split('/').collect();
    for (i, level) in levels.iter().enumerate() {
        if *level == "#" && i != levels.len() - 1 {
            return Some("a filter with '#' only as the last level");
        }
        if level.len() > 1 && (level.contains('#') || level.contains('+')) {
            return Some("a filter whose wildcards occupy a whole level");
        }
    }

    None
}

impl fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for TopicFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for TopicFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TopicFilter::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(s: &str) -> TopicFilter {
        TopicFilter::new(s).unwrap()
    }

    #[test]
    fn test_exact_match() {
        assert!(filter("irssi/hilight").matches("irssi/hilight"));
        assert!(!filter("irssi/hilight").matches("irssi/pm"));
        assert!(!filter("irssi").matches("irssi/pm"));
    }

    #[test]
    fn test_single_level_wildcard() {
        assert!(filter("irssi/+/nick").matches("irssi/libera/nick"));
        assert!(!filter("irssi/+/nick").matches("irssi/libera/other/nick"));
        assert!(!filter("irssi/+").matches("irssi"));
        assert!(filter("+").matches("irssi"));
    }

    #[test]
    fn test_multi_level_wildcard() {
        assert!(filter("#").matches("anything/at/all"));
        assert!(filter("irssi/#").matches("irssi/a/b/c"));
        assert!(filter("irssi/#").matches("irssi"));
        assert!(!filter("irssi/#").matches("weechat/a"));
    }

    #[test]
    fn test_invalid_filters() {
        assert!(TopicFilter::new("").is_err());
        assert!(TopicFilter::new("a/#/b").is_err());
        assert!(TopicFilter::new("a/b#").is_err());
        assert!(TopicFilter::new("a/+b").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: TopicFilter = serde_json::from_str("\"irssi/#\"").unwrap();
        assert_eq!(ok.as_str(), "irssi/#");
        assert!(serde_json::from_str::<TopicFilter>("\"#/x\"").is_err());
    }
}
