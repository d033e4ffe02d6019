//! Generic parser: topic as title, payload as message.

use crate::notification::error::ParseError;
use crate::notification::icon::Icon;
use crate::notification::parser::Parser;
use crate::notification::plugin_config::{resolve_icon, PluginConfig};
use crate::notification::request::{NotificationRequest, RawMessage};
use crate::notification::runners::NOTIFY_RUNNER;

pub const PASSTHROUGH_PARSER: &str = "notify";

#[derive(Debug, Clone)]
pub struct PassthroughParser {
    default_icon: Icon,
}

impl PassthroughParser {
    pub fn new() -> Self {
        Self {
            default_icon: Icon::bundled(PASSTHROUGH_PARSER),
        }
    }
}

impl Default for PassthroughParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PassthroughParser {
    fn name(&self) -> &str {
        PASSTHROUGH_PARSER
    }

    fn prepare(
        &self,
        msg: Option<&RawMessage>,
        config: Option<&PluginConfig>,
    ) -> Result<NotificationRequest, ParseError> {
        let Some(msg) = msg.filter(|m| !m.payload.is_empty()) else {
            return Ok(NotificationRequest::empty(config.cloned()));
        };

        let icon = resolve_icon(config)
            .ok()
            .flatten()
            .unwrap_or_else(|| self.default_icon.clone());

        Ok(
            NotificationRequest::new(msg.topic.as_str(), msg.payload.clone(), NOTIFY_RUNNER)
                .with_icon(icon)
                .with_config(config.cloned()),
        )
    }
}
