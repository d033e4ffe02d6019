//! 通知系统构建器 - 注册内置 parser / runner 并加载路由

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::backend::Backend;
use super::dispatcher::{NotificationDispatcher, Route};
use super::parsers::{IrssiParser, PassthroughParser};
use super::runners::{NotifyRunner, DEFAULT_RENDER_TIMEOUT};
use crate::config::AppConfig;

/// 通知系统构建器
pub struct NotificationBuilder {
    /// 未设置时不注册 notify runner（仅解析 / dry-run）
    backend: Option<Arc<dyn Backend>>,
    routes: Vec<Route>,
    render_timeout: Duration,
    dry_run: bool,
}

impl NotificationBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            routes: Vec::new(),
            render_timeout: DEFAULT_RENDER_TIMEOUT,
            dry_run: false,
        }
    }

    /// 从应用配置读取路由、超时和 dry-run
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .routes(config.routes.clone())
            .render_timeout(config.render_timeout())
            .dry_run(config.dry_run)
    }

    /// 设置展示后端
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// 设置路由（按顺序匹配）
    pub fn routes(mut self, routes: Vec<Route>) -> Self {
        self.routes = routes;
        self
    }

    /// 追加一条路由
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// 设置单次渲染超时
    pub fn render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }

    /// 设置 dry-run 模式
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 构建 NotificationDispatcher
    pub fn build(self) -> NotificationDispatcher {
        let mut dispatcher = NotificationDispatcher::new().with_dry_run(self.dry_run);

        dispatcher.register_parser(Arc::new(IrssiParser::new()));
        dispatcher.register_parser(Arc::new(PassthroughParser::new()));

        if let Some(backend) = self.backend {
            let runner = NotifyRunner::new(backend).with_timeout(self.render_timeout);
            dispatcher.register_runner(Arc::new(runner));
        }

        for route in self.routes {
            dispatcher.add_route(route);
        }

        info!(
            routes = dispatcher.routes().len(),
            dry_run = self.dry_run,
            "Dispatcher ready"
        );
        dispatcher
    }
}

impl Default for NotificationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
