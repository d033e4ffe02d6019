//! 通知管道的错误类型
//!
//! Parser errors, runner errors and routing errors are kept apart so the
//! dispatcher can log each one with the right context before dropping the
//! message.

use std::time::Duration;

use thiserror::Error;

/// A parser recognised the payload's format but could not split it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The leading character announced a bracketed title but the closing
    /// delimiter never shows up (e.g. `"[truncated"`).
    #[error("malformed payload: expected closing '{delimiter}' in {payload:?}")]
    MalformedPayload { delimiter: char, payload: String },
}

/// Title or message bytes were not valid UTF-8.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field} is not valid UTF-8: {source}")]
pub struct EncodingError {
    pub field: &'static str,
    #[source]
    pub source: std::str::Utf8Error,
}

/// A recognised plugin config key carried a value we can't use.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid urgency {0:?}, expected one of low, normal, critical")]
    InvalidUrgency(String),

    #[error("config key {key:?} must be {expected}")]
    InvalidValue { key: String, expected: &'static str },
}

/// A runner failed to render a request.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend session has been closed (or was never opened).
    #[error("notification backend unavailable: {0}")]
    Unavailable(String),

    #[error("notification backend timed out after {0:?}")]
    Timeout(Duration),

    /// The backend was reachable but refused the notification.
    #[error("notification backend failed: {0}")]
    Backend(String),
}

/// Routing failure or a wrapped parser/runner failure.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no parser configured for topic {topic:?}")]
    UnknownParser { topic: String },

    #[error("parser {parser:?} is not registered (topic {topic:?})")]
    UnregisteredParser { parser: String, topic: String },

    #[error("no runner registered under {0:?}")]
    UnknownRunner(String),

    #[error("parser {parser} failed: {source}")]
    Parse {
        parser: String,
        #[source]
        source: ParseError,
    },

    #[error("runner {runner} failed: {source}")]
    Render {
        runner: String,
        #[source]
        source: RenderError,
    },
}
