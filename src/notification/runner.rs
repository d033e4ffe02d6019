//! Runner plugin trait 定义

use async_trait::async_trait;

use super::error::RenderError;
use super::request::NotificationRequest;

/// Renders a [`NotificationRequest`] through some delivery backend.
///
/// Fire-and-forget: a successful return only means the backend accepted the
/// notification.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Name a request's `runner` field refers to.
    fn name(&self) -> &str;

    async fn render(&self, req: &NotificationRequest) -> Result<(), RenderError>;
}
