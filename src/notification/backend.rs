//! 桌面通知后端 - 通过 notify-send (libnotify) 显示通知
//!
//! The backend is opened once at startup and shared by every runner through
//! an `Arc`. Calls into it are serialized by a mutex; closing it makes every
//! later `show` fail with [`RenderError::Unavailable`].

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::RenderError;
use super::icon::Icon;
use super::urgency::Urgency;

pub const NOTIFY_SEND: &str = "notify-send";

/// A fully resolved notification, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopNotification {
    pub summary: String,
    pub body: String,
    pub icon: Option<Icon>,
    pub urgency: Urgency,
}

/// Something that can put a notification on screen.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    async fn show(&self, notification: &DesktopNotification) -> Result<(), RenderError>;
}

/// 后端配置
#[derive(Debug, Clone)]
pub struct BackendOptions {
    /// 通知中显示的应用名
    pub app_name: String,
    /// notify-send 路径，未设置时从 PATH 查找
    pub program: Option<PathBuf>,
    /// 通知显示时长，未设置时使用通知服务默认值
    pub expire_time: Option<Duration>,
}

impl BackendOptions {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            program: None,
            expire_time: None,
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn with_expire_time(mut self, expire_time: Option<Duration>) -> Self {
        self.expire_time = expire_time;
        self
    }
}

#[derive(Debug)]
struct Session {
    program: PathBuf,
}

/// Process-wide handle on the desktop notification facility.
#[derive(Debug)]
pub struct NotificationBackend {
    options: BackendOptions,
    session: Mutex<Option<Session>>,
}

impl NotificationBackend {
    /// Locate `notify-send` and open a session. Fails if the tool is missing.
    pub fn open(options: BackendOptions) -> Result<Self, RenderError> {
        let wanted = options
            .program
            .clone()
            .unwrap_or_else(|| PathBuf::from(NOTIFY_SEND));

        let program = which::which(&wanted).map_err(|e| {
            RenderError::Unavailable(format!("cannot find {}: {}", wanted.display(), e))
        })?;

        info!(
            program = %program.display(),
            app_name = %options.app_name,
            "Notification backend opened"
        );

        Ok(Self {
            options,
            session: Mutex::new(Some(Session { program })),
        })
    }

    /// Tear the session down. Idempotent.
    pub async fn close(&self) {
        if self.session.lock().await.take().is_some() {
            info!(app_name = %self.options.app_name, "Notification backend closed");
        }
    }

    pub async fn is_open(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// notify-send 命令行参数
    fn command_args(&self, notification: &DesktopNotification) -> Vec<String> {
        let mut args = vec![
            "--app-name".to_string(),
            self.options.app_name.clone(),
            "--urgency".to_string(),
            notification.urgency.as_str().to_string(),
        ];

        if let Some(icon) = &notification.icon {
            args.push("--icon".to_string());
            args.push(icon.as_arg());
        }

        if let Some(expire) = self.options.expire_time {
            args.push("--expire-time".to_string());
            args.push(expire.as_millis().to_string());
        }

        // `--` so a summary starting with '-' isn't read as a flag
        args.push("--".to_string());
        args.push(notification.summary.clone());
        args.push(notification.body.clone());
        args
    }
}

#[async_trait]
impl Backend for NotificationBackend {
    fn name(&self) -> &str {
        NOTIFY_SEND
    }

    async fn show(&self, notification: &DesktopNotification) -> Result<(), RenderError> {
        let session = self.session.lock().await;
        let Some(session) = session.as_ref() else {
            return Err(RenderError::Unavailable("backend is closed".to_string()));
        };

        let output = Command::new(&session.program)
            .args(self.command_args(notification))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                RenderError::Backend(format!("failed to spawn {}: {}", NOTIFY_SEND, e))
            })?;

        if output.status.success() {
            debug!(
                summary = %notification.summary,
                urgency = %notification.urgency,
                "Notification shown"
            );
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, error = %stderr, "notify-send failed");
            Err(RenderError::Backend(if stderr.is_empty() {
                format!("{} exited with {}", NOTIFY_SEND, output.status)
            } else {
                stderr
            }))
        }
    }
}
