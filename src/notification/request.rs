//! 消息数据模型 - 从总线收到的原始消息与交给 runner 的通知请求

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};

use super::error::EncodingError;
use super::icon::Icon;
use super::plugin_config::PluginConfig;

/// Raw message bytes as delivered by the transport.
///
/// Producers usually publish UTF-8 text but nothing on the bus guarantees it,
/// so decoding is deferred to the runner.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<u8> {
        self.0.first().copied()
    }

    /// Index of the first `byte`.
    pub fn position(&self, byte: u8) -> Option<usize> {
        self.0.iter().position(|b| *b == byte)
    }

    /// Split at the first occurrence of `delimiter`, dropping it.
    pub fn split_once(&self, delimiter: u8) -> Option<(Payload, Payload)> {
        let idx = self.position(delimiter)?;
        Some((
            Payload(self.0[..idx].to_vec()),
            Payload(self.0[idx + 1..].to_vec()),
        ))
    }

    /// Strict UTF-8 decode; `field` names the request field for the error.
    pub fn to_text(&self, field: &'static str) -> Result<&str, EncodingError> {
        std::str::from_utf8(&self.0).map_err(|source| EncodingError { field, source })
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "{:?}", s),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Text payloads serialize as strings, anything else as a byte array.
impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(&self.0) {
            Ok(s) => serializer.serialize_str(s),
            Err(_) => self.0.serialize(serializer),
        }
    }
}

/// 总线投递的原始消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// 发布的 topic
    pub topic: String,
    /// 消息体（可能为空）
    pub payload: Payload,
}

impl RawMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Normalized notification handed from a parser to exactly one runner.
///
/// An *empty* request (no title, message, icon or runner) means there is
/// nothing to deliver; it is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotificationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Payload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Payload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PluginConfig>,
}

impl NotificationRequest {
    /// Nothing to deliver, config still passed along.
    pub fn empty(config: Option<PluginConfig>) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn new(
        title: impl Into<Payload>,
        message: impl Into<Payload>,
        runner: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            message: Some(message.into()),
            icon: None,
            runner: Some(runner.into()),
            config: None,
        }
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_config(mut self, config: Option<PluginConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.message.is_none()
            && self.icon.is_none()
            && self.runner.is_none()
    }
}
