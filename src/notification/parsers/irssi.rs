//! irssi-mqtt-notify 消息解析
//!
//! The irssi bridge has published a few payload shapes over time:
//!
//! - `(nick) text` for private messages
//! - `[#channel/nick] text` for highlights
//! - `title:text` from older bridge versions
//!
//! Anything else is shown with the topic as title so no content is lost.

use tracing::debug;

use crate::notification::error::ParseError;
use crate::notification::icon::Icon;
use crate::notification::parser::Parser;
use crate::notification::plugin_config::{resolve_icon, PluginConfig};
use crate::notification::request::{NotificationRequest, Payload, RawMessage};
use crate::notification::runners::NOTIFY_RUNNER;

pub const IRSSI_PARSER: &str = "irssi";

/// Payload sub-format produced by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrssiFormat {
    /// `(nick) text`
    PrivateMessage,
    /// `[target] text`
    Highlight,
    /// `title:text`
    Colon,
    /// Fallback: title is the topic
    Unrecognized,
}

impl IrssiFormat {
    /// Bracket forms win over the colon form.
    const DETECTION_ORDER: [IrssiFormat; 3] = [
        IrssiFormat::PrivateMessage,
        IrssiFormat::Highlight,
        IrssiFormat::Colon,
    ];

    pub fn detect(payload: &Payload) -> Self {
        Self::DETECTION_ORDER
            .into_iter()
            .find(|format| format.matches(payload))
            .unwrap_or(IrssiFormat::Unrecognized)
    }

    fn matches(self, payload: &Payload) -> bool {
        match self {
            IrssiFormat::PrivateMessage => payload.first() == Some(b'('),
            IrssiFormat::Highlight => payload.first() == Some(b'['),
            // A leading colon would leave an empty title.
            IrssiFormat::Colon => payload.position(b':').is_some_and(|i| i > 0),
            IrssiFormat::Unrecognized => true,
        }
    }

    /// Closing character of the embedded title, kept in the title.
    pub fn delimiter(self) -> Option<u8> {
        match self {
            IrssiFormat::PrivateMessage => Some(b')'),
            IrssiFormat::Highlight => Some(b']'),
            IrssiFormat::Colon | IrssiFormat::Unrecognized => None,
        }
    }

    /// Split `msg` into `(title, message)`.
    pub fn split(self, msg: &RawMessage) -> Result<(Payload, Payload), ParseError> {
        if let Some(delimiter) = self.delimiter() {
            let (head, tail) = msg.payload.split_once(delimiter).ok_or_else(|| {
                ParseError::MalformedPayload {
                    delimiter: delimiter as char,
                    payload: msg.payload.to_string_lossy().into_owned(),
                }
            })?;
            let mut title = head.as_bytes().to_vec();
            title.push(delimiter);
            return Ok((Payload::from(title), tail));
        }

        let colon_split = match self {
            IrssiFormat::Colon => msg.payload.split_once(b':'),
            _ => None,
        };
        Ok(colon_split
            .unwrap_or_else(|| (Payload::from(msg.topic.as_str()), msg.payload.clone())))
    }
}

/// Parser for payloads published by irssi-mqtt-notify.
#[derive(Debug, Clone)]
pub struct IrssiParser {
    default_icon: Icon,
}

impl IrssiParser {
    pub fn new() -> Self {
        Self {
            default_icon: Icon::bundled(IRSSI_PARSER),
        }
    }
}

impl Default for IrssiParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for IrssiParser {
    fn name(&self) -> &str {
        IRSSI_PARSER
    }

    fn prepare(
        &self,
        msg: Option<&RawMessage>,
        config: Option<&PluginConfig>,
    ) -> Result<NotificationRequest, ParseError> {
        let Some(msg) = msg.filter(|m| !m.payload.is_empty()) else {
            return Ok(NotificationRequest::empty(config.cloned()));
        };

        let format = IrssiFormat::detect(&msg.payload);
        let (title, message) = format.split(msg)?;
        debug!(topic = %msg.topic, ?format, "Detected irssi payload format");

        // An unusable icon value is reported by the runner, which reads the same key.
        let icon = resolve_icon(config)
            .ok()
            .flatten()
            .unwrap_or_else(|| self.default_icon.clone());

        Ok(NotificationRequest::new(title, message, NOTIFY_RUNNER)
            .with_icon(icon)
            .with_config(config.cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepare(topic: &str, payload: &str) -> Result<NotificationRequest, ParseError> {
        IrssiParser::new().prepare(Some(&RawMessage::new(topic, payload)), None)
    }

    #[test]
    fn test_detect_formats() {
        assert_eq!(IrssiFormat::detect(&"(bob) hi".into()), IrssiFormat::PrivateMessage);
        assert_eq!(IrssiFormat::detect(&"[#rust] hi".into()), IrssiFormat::Highlight);
        assert_eq!(IrssiFormat::detect(&"bob: hi".into()), IrssiFormat::Colon);
        assert_eq!(IrssiFormat::detect(&"hello".into()), IrssiFormat::Unrecognized);
    }

    #[test]
    fn test_bracket_detection_wins_over_colon() {
        assert_eq!(
            IrssiFormat::detect(&"[#rust/bob] re: lifetimes".into()),
            IrssiFormat::Highlight
        );
        assert_eq!(
            IrssiFormat::detect(&"(bob) see: this".into()),
            IrssiFormat::PrivateMessage
        );
    }

    #[test]
    fn test_highlight() {
        let req = prepare("irssi", "[user] hello world").unwrap();
        assert_eq!(req.title, Some(Payload::from("[user]")));
        assert_eq!(req.message, Some(Payload::from(" hello world")));
        assert_eq!(req.runner.as_deref(), Some("notify"));
    }

    #[test]
    fn test_private_message() {
        let req = prepare("irssi", "(friend) hi there").unwrap();
        assert_eq!(req.title, Some(Payload::from("(friend)")));
        assert_eq!(req.message, Some(Payload::from(" hi there")));
    }

    #[test]
    fn test_split_at_first_delimiter_only() {
        let req = prepare("irssi", "(a) b) c").unwrap();
        assert_eq!(req.title, Some(Payload::from("(a)")));
        assert_eq!(req.message, Some(Payload::from(" b) c")));
    }

    #[test]
    fn test_unrecognized_uses_topic_as_title() {
        let req = prepare("irc/server", "plain status update").unwrap();
        assert_eq!(req.title, Some(Payload::from("irc/server")));
        assert_eq!(req.message, Some(Payload::from("plain status update")));
    }

    #[test]
    fn test_colon_format() {
        let req = prepare("irssi", "bob:lunch? time: noon").unwrap();
        assert_eq!(req.title, Some(Payload::from("bob")));
        assert_eq!(req.message, Some(Payload::from("lunch? time: noon")));
    }

    #[test]
    fn test_leading_colon_uses_topic() {
        assert_eq!(IrssiFormat::detect(&":hi".into()), IrssiFormat::Unrecognized);
        let req = prepare("irc/x", ":hi").unwrap();
        assert_eq!(req.title, Some(Payload::from("irc/x")));
        assert_eq!(req.message, Some(Payload::from(":hi")));

        let req = prepare("irc/x", ":").unwrap();
        assert_eq!(req.title, Some(Payload::from("irc/x")));
    }

    #[test]
    fn test_empty_tail_is_valid() {
        let req = prepare("irssi", "[x]").unwrap();
        assert_eq!(req.title, Some(Payload::from("[x]")));
        assert_eq!(req.message, Some(Payload::default()));

        let req = prepare("irssi", "()").unwrap();
        assert_eq!(req.title, Some(Payload::from("()")));
        assert_eq!(req.message, Some(Payload::default()));
    }

    #[test]
    fn test_missing_delimiter_is_malformed() {
        let err = prepare("irssi", "[truncated").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedPayload {
                delimiter: ']',
                payload: "[truncated".to_string()
            }
        );
        assert!(prepare("irssi", "(").is_err());
    }

    #[test]
    fn test_absent_message_is_empty() {
        let req = IrssiParser::new().prepare(None, None).unwrap();
        assert!(req.is_empty());
        assert!(req.runner.is_none());
    }

    #[test]
    fn test_empty_payload_is_empty() {
        let req = prepare("irssi", "").unwrap();
        assert!(req.is_empty());
    }

    #[test]
    fn test_default_icon_and_config_passthrough() {
        let config = PluginConfig::new().with("urgency", "critical");
        let req = IrssiParser::new()
            .prepare(Some(&RawMessage::new("irssi", "[a] b")), Some(&config))
            .unwrap();
        assert_eq!(req.icon, Some(Icon::bundled("irssi")));
        assert_eq!(req.config, Some(config));
    }

    #[test]
    fn test_config_icon_override() {
        let config = PluginConfig::new().with("icon", "/opt/irc.png");
        let req = IrssiParser::new()
            .prepare(Some(&RawMessage::new("irssi", "[a] b")), Some(&config))
            .unwrap();
        assert_eq!(req.icon, Some(Icon::Path("/opt/irc.png".into())));
    }

    #[test]
    fn test_non_utf8_payload_is_split_bytewise() {
        let msg = RawMessage::new("irssi", vec![b'(', b'b', b')', b' ', 0xff]);
        let req = IrssiParser::new().prepare(Some(&msg), None).unwrap();
        assert_eq!(req.title, Some(Payload::from("(b)")));
        assert_eq!(req.message, Some(Payload::from(vec![b' ', 0xff])));
    }
}
