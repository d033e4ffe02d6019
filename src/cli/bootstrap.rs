// src/cli/bootstrap.rs
//! 启动流程 - 读取配置、打开通知后端、构建分发器

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::notification::{
    BackendOptions, NotificationBackend, NotificationBuilder, NotificationDispatcher,
};

/// 所有子命令共享的参数
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// 配置文件路径（默认 ~/.config/mqtt-notify/config.json）
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
    /// 只解析并打印，不显示通知
    #[arg(long, global = true)]
    pub dry_run: bool,
}

impl GlobalArgs {
    /// 读取配置并应用命令行覆盖
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if self.dry_run {
            config.dry_run = true;
        }
        Ok(config)
    }
}

/// Running pipeline: the dispatcher plus the backend it renders through.
pub struct Pipeline {
    pub dispatcher: Arc<NotificationDispatcher>,
    backend: Option<Arc<NotificationBackend>>,
}

impl Pipeline {
    /// Open the backend (skipped in dry-run) and build the dispatcher.
    /// A backend that can't be opened aborts startup.
    pub fn start(config: &AppConfig) -> Result<Self> {
        let mut builder = NotificationBuilder::from_config(config);

        let backend = if config.dry_run {
            info!("Dry-run mode, notification backend not opened");
            None
        } else {
            let options = BackendOptions::new(config.app_name.clone())
                .with_expire_time(config.expire_time());
            let backend = Arc::new(
                NotificationBackend::open(options)
                    .context("Failed to initialize notification backend")?,
            );
            builder = builder.backend(backend.clone());
            Some(backend)
        };

        Ok(Self {
            dispatcher: Arc::new(builder.build()),
            backend,
        })
    }

    /// Close the backend session.
    pub async fn shutdown(self) {
        if let Some(backend) = self.backend {
            backend.close().await;
        }
    }
}
