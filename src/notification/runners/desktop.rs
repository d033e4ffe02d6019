//! 桌面通知 runner

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::notification::backend::{Backend, DesktopNotification};
use crate::notification::error::RenderError;
use crate::notification::icon::Icon;
use crate::notification::plugin_config::{resolve_icon, resolve_urgency};
use crate::notification::request::{NotificationRequest, Payload};
use crate::notification::runner::Runner;

use super::NOTIFY_RUNNER;

pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(5);

/// Shows requests as desktop notifications.
pub struct NotifyRunner {
    backend: Arc<dyn Backend>,
    default_icon: Icon,
    timeout: Duration,
}

impl NotifyRunner {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            default_icon: Icon::bundled(NOTIFY_RUNNER),
            timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_icon(mut self, icon: Icon) -> Self {
        self.default_icon = icon;
        self
    }

    /// Resolve config, icon and text into what the backend displays.
    ///
    /// Icon precedence: config `icon`, then the request's icon, then the
    /// runner's bundled icon.
    pub fn build(&self, req: &NotificationRequest) -> Result<DesktopNotification, RenderError> {
        let config = req.config.as_ref();
        let urgency = resolve_urgency(config)?;
        let icon = resolve_icon(config)?
            .or_else(|| req.icon.clone())
            .unwrap_or_else(|| self.default_icon.clone());

        Ok(DesktopNotification {
            summary: decode(req.title.as_ref(), "title")?,
            body: decode(req.message.as_ref(), "message")?,
            icon: Some(icon),
            urgency,
        })
    }
}

fn decode(text: Option<&Payload>, field: &'static str) -> Result<String, RenderError> {
    match text {
        Some(payload) => Ok(payload.to_text(field)?.to_string()),
        None => Ok(String::new()),
    }
}

#[async_trait]
impl Runner for NotifyRunner {
    fn name(&self) -> &str {
        NOTIFY_RUNNER
    }

    async fn render(&self, req: &NotificationRequest) -> Result<(), RenderError> {
        if req.is_empty() {
            debug!(runner = NOTIFY_RUNNER, "Empty request, nothing to show");
            return Ok(());
        }

        let notification = self.build(req)?;

        tokio::time::timeout(self.timeout, self.backend.show(&notification))
            .await
            .map_err(|_| RenderError::Timeout(self.timeout))??;

        info!(
            runner = NOTIFY_RUNNER,
            backend = self.backend.name(),
            urgency = %notification.urgency,
            summary = %notification.summary,
            "Notification rendered"
        );
        Ok(())
    }
}
