//! 应用配置 - `~/.config/mqtt-notify/config.json`
//!
//! ```json
//! {
//!   "app_name": "mqtt-notify",
//!   "render_timeout_ms": 5000,
//!   "routes": [
//!     { "topic": "irssi/#", "parser": "irssi", "config": { "urgency": "critical" } },
//!     { "topic": "#", "parser": "notify" }
//!   ]
//! }
//! ```
//!
//! Every field is optional; a missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::notification::dispatcher::Route;
use crate::notification::parsers::{IRSSI_PARSER, PASSTHROUGH_PARSER};
use crate::notification::topic::TopicFilter;

pub const APP_NAME: &str = "mqtt-notify";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 通知中显示的应用名
    pub app_name: String,
    /// 单次渲染超时（毫秒）
    pub render_timeout_ms: u64,
    /// 通知显示时长（毫秒），未设置时由通知服务决定
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_time_ms: Option<u64>,
    /// 只解析不展示
    pub dry_run: bool,
    /// topic 路由，按顺序匹配
    pub routes: Vec<Route>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            render_timeout_ms: 5000,
            expire_time_ms: None,
            dry_run: false,
            routes: default_routes(),
        }
    }
}

fn default_routes() -> Vec<Route> {
    let mut routes = Vec::new();
    if let Ok(filter) = TopicFilter::new("irssi/#") {
        routes.push(Route::new(filter, IRSSI_PARSER));
    }
    if let Ok(filter) = TopicFilter::new("#") {
        routes.push(Route::new(filter, PASSTHROUGH_PARSER));
    }
    routes
}

impl AppConfig {
    /// 默认配置文件路径
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_NAME)
            .join("config.json")
    }

    /// 读取配置；`path` 未指定时使用默认路径，默认路径不存在时返回默认配置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    debug!(path = %path.display(), "No config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!(path = %path.display(), routes = config.routes.len(), "Loaded config");
        Ok(config)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn expire_time(&self) -> Option<Duration> {
        self.expire_time_ms.map(Duration::from_millis)
    }
}
