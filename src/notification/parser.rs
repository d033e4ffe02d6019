//! Parser plugin trait 定义

use super::error::ParseError;
use super::plugin_config::PluginConfig;
use super::request::{NotificationRequest, RawMessage};

/// Turns a producer specific payload into a [`NotificationRequest`].
///
/// Implementations must accept a missing message and/or config and return an
/// empty request for a missing message.
pub trait Parser: Send + Sync {
    /// Name used in routes and logs.
    fn name(&self) -> &str;

    fn prepare(
        &self,
        msg: Option<&RawMessage>,
        config: Option<&PluginConfig>,
    ) -> Result<NotificationRequest, ParseError>;
}
