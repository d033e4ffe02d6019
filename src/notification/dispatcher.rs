//! 通知分发器 - 按 topic 选择 parser，再按请求的 runner 字段选择 runner

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::error::DispatchError;
use super::parser::Parser;
use super::plugin_config::PluginConfig;
use super::request::{NotificationRequest, RawMessage};
use super::runner::Runner;
use super::topic::TopicFilter;

/// 路由规则：匹配 topic 的消息交给指定 parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// topic 过滤器（支持 `+` / `#`）
    pub topic: TopicFilter,
    /// parser 名称
    pub parser: String,
    /// 传给 parser 和 runner 的插件配置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PluginConfig>,
}

impl Route {
    pub fn new(topic: TopicFilter, parser: impl Into<String>) -> Self {
        Self {
            topic,
            parser: parser.into(),
            config: None,
        }
    }

    pub fn with_config(mut self, config: PluginConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// 分发结果
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    /// 已交给 runner
    Delivered { runner: String },
    /// 跳过（空请求或 dry-run）
    Skipped(String),
    /// 失败（已记录日志）
    Failed(String),
}

/// `run` 结束时的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DispatchStats {
    fn record(&mut self, result: &DispatchResult) {
        match result {
            DispatchResult::Delivered { .. } => self.delivered += 1,
            DispatchResult::Skipped(_) => self.skipped += 1,
            DispatchResult::Failed(_) => self.failed += 1,
        }
    }
}

/// 通知分发器 - 管理 parser / runner 注册表和 topic 路由
pub struct NotificationDispatcher {
    parsers: HashMap<String, Arc<dyn Parser>>,
    runners: HashMap<String, Arc<dyn Runner>>,
    /// 按顺序匹配，第一个命中的生效
    routes: Vec<Route>,
    /// 是否为 dry-run 模式
    dry_run: bool,
}

impl NotificationDispatcher {
    /// 创建新的分发器
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
            runners: HashMap::new(),
            routes: Vec::new(),
            dry_run: false,
        }
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 注册 parser
    pub fn register_parser(&mut self, parser: Arc<dyn Parser>) {
        info!(parser = parser.name(), "Registering parser");
        self.parsers.insert(parser.name().to_string(), parser);
    }

    /// 注册 runner
    pub fn register_runner(&mut self, runner: Arc<dyn Runner>) {
        info!(runner = runner.name(), "Registering runner");
        self.runners.insert(runner.name().to_string(), runner);
    }

    /// 追加路由
    pub fn add_route(&mut self, route: Route) {
        debug!(topic = %route.topic, parser = %route.parser, "Adding route");
        self.routes.push(route);
    }

    pub fn route_for(&self, topic: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.topic.matches(topic))
    }

    pub fn parser_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn runner_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.runners.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Parse `msg` with the routed parser, or with `parser_override` when given.
    pub fn prepare(
        &self,
        msg: &RawMessage,
        parser_override: Option<&str>,
    ) -> Result<NotificationRequest, DispatchError> {
        let route = self.route_for(&msg.topic);
        let parser_name = match (parser_override, route) {
            (Some(name), _) => name,
            (None, Some(route)) => route.parser.as_str(),
            (None, None) => {
                return Err(DispatchError::UnknownParser {
                    topic: msg.topic.clone(),
                })
            }
        };

        let parser = self.parsers.get(parser_name).ok_or_else(|| {
            DispatchError::UnregisteredParser {
                parser: parser_name.to_string(),
                topic: msg.topic.clone(),
            }
        })?;

        let config = route.and_then(|r| r.config.as_ref());
        parser
            .prepare(Some(msg), config)
            .map_err(|source| DispatchError::Parse {
                parser: parser_name.to_string(),
                source,
            })
    }

    /// Parse and render one message, surfacing every failure.
    pub async fn try_dispatch(&self, msg: &RawMessage) -> Result<DispatchResult, DispatchError> {
        let req = self.prepare(msg, None)?;

        if req.is_empty() {
            debug!(topic = %msg.topic, "Empty request, nothing to deliver");
            return Ok(DispatchResult::Skipped("empty request".to_string()));
        }

        let runner_name = req.runner.clone().unwrap_or_default();

        // dry-run 不需要已打开的后端，runner 可能未注册
        if self.dry_run {
            info!(
                topic = %msg.topic,
                runner = %runner_name,
                registered = self.runners.contains_key(&runner_name),
                title = ?req.title,
                message = ?req.message,
                "[DRY-RUN] Would render notification"
            );
            return Ok(DispatchResult::Skipped("dry-run".to_string()));
        }

        let runner = self
            .runners
            .get(&runner_name)
            .ok_or_else(|| DispatchError::UnknownRunner(runner_name.clone()))?;

        runner
            .render(&req)
            .await
            .map_err(|source| DispatchError::Render {
                runner: runner_name.clone(),
                source,
            })?;

        Ok(DispatchResult::Delivered { runner: runner_name })
    }

    /// Dispatch one message. Never fails: errors are logged and the message dropped.
    pub async fn dispatch(&self, msg: RawMessage) -> DispatchResult {
        match self.try_dispatch(&msg).await {
            Ok(result) => result,
            Err(e) => {
                warn!(topic = %msg.topic, error = %e, "Dropping message");
                DispatchResult::Failed(e.to_string())
            }
        }
    }

    /// Consume messages until the channel closes, one task per message.
    pub async fn run(self: Arc<Self>, mut receiver: mpsc::Receiver<RawMessage>) -> DispatchStats {
        let mut stats = DispatchStats::default();
        let mut tasks = JoinSet::new();

        while let Some(msg) = receiver.recv().await {
            let dispatcher = Arc::clone(&self);
            tasks.spawn(async move { dispatcher.dispatch(msg).await });

            while let Some(joined) = tasks.try_join_next() {
                record_joined(&mut stats, joined);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            record_joined(&mut stats, joined);
        }

        info!(
            delivered = stats.delivered,
            skipped = stats.skipped,
            failed = stats.failed,
            "Input closed, dispatcher stopped"
        );
        stats
    }
}

fn record_joined(
    stats: &mut DispatchStats,
    joined: Result<DispatchResult, tokio::task::JoinError>,
) {
    match joined {
        Ok(result) => stats.record(&result),
        Err(e) => {
            warn!(error = %e, "Dispatch task aborted");
            stats.failed += 1;
        }
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::error::{ParseError, RenderError};
    use crate::notification::parsers::IrssiParser;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 测试用的 mock runner
    struct MockRunner {
        name: String,
        render_count: AtomicUsize,
        fail: bool,
    }

    impl MockRunner {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                render_count: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing(name: &str) -> Self {
            Self {
                fail: true,
                ..Self::new(name)
            }
        }

        fn get_render_count(&self) -> usize {
            self.render_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Runner for MockRunner {
        fn name(&self) -> &str {
            &self.name
        }

        async fn render(&self, _req: &NotificationRequest) -> Result<(), RenderError> {
            self.render_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(RenderError::Unavailable("mock".to_string()))
            } else {
                Ok(())
            }
        }
    }

    /// Parser that targets a runner nobody registered
    struct MisroutedParser;

    impl Parser for MisroutedParser {
        fn name(&self) -> &str {
            "misrouted"
        }

        fn prepare(
            &self,
            msg: Option<&RawMessage>,
            _config: Option<&PluginConfig>,
        ) -> Result<NotificationRequest, ParseError> {
            let msg = msg.expect("message");
            Ok(NotificationRequest::new(msg.topic.as_str(), msg.payload.clone(), "email"))
        }
    }

    fn dispatcher_with(runner: Arc<MockRunner>) -> NotificationDispatcher {
        let mut dispatcher = NotificationDispatcher::new();
        dispatcher.register_parser(Arc::new(IrssiParser::new()));
        dispatcher.register_parser(Arc::new(MisroutedParser));
        dispatcher.register_runner(runner);
        dispatcher.add_route(Route::new(TopicFilter::new("irssi/#").unwrap(), "irssi"));
        dispatcher.add_route(Route::new(TopicFilter::new("mail/#").unwrap(), "misrouted"));
        dispatcher.add_route(Route::new(TopicFilter::new("legacy/#").unwrap(), "gone"));
        dispatcher
    }

    #[test]
    fn test_register_and_routes() {
        let dispatcher = dispatcher_with(Arc::new(MockRunner::new("notify")));
        assert_eq!(dispatcher.parser_names(), vec!["irssi", "misrouted"]);
        assert_eq!(dispatcher.runner_names(), vec!["notify"]);
        assert_eq!(dispatcher.route_for("irssi/pm").unwrap().parser, "irssi");
        assert!(dispatcher.route_for("other").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_delivers() {
        let runner = Arc::new(MockRunner::new("notify"));
        let dispatcher = dispatcher_with(runner.clone());

        let result = dispatcher
            .dispatch(RawMessage::new("irssi/hilight", "[user] hello world"))
            .await;
        assert_eq!(
            result,
            DispatchResult::Delivered {
                runner: "notify".to_string()
            }
        );
        assert_eq!(runner.get_render_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_runner_is_reported_not_raised() {
        let runner = Arc::new(MockRunner::new("notify"));
        let dispatcher = dispatcher_with(runner.clone());

        let err = dispatcher
            .try_dispatch(&RawMessage::new("mail/inbox", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownRunner(ref r) if r == "email"));

        let result = dispatcher.dispatch(RawMessage::new("mail/inbox", "hi")).await;
        assert!(matches!(result, DispatchResult::Failed(_)));

        // next message still goes through
        let result = dispatcher.dispatch(RawMessage::new("irssi/pm", "(a) b")).await;
        assert!(matches!(result, DispatchResult::Delivered { .. }));
    }

    #[tokio::test]
    async fn test_unknown_parser() {
        let dispatcher = dispatcher_with(Arc::new(MockRunner::new("notify")));

        let err = dispatcher
            .try_dispatch(&RawMessage::new("weather/today", "sunny"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownParser { .. }));

        let err = dispatcher
            .try_dispatch(&RawMessage::new("legacy/x", "y"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::UnregisteredParser { ref parser, .. } if parser == "gone"
        ));
    }

    #[tokio::test]
    async fn test_malformed_payload_fails_without_render() {
        let runner = Arc::new(MockRunner::new("notify"));
        let dispatcher = dispatcher_with(runner.clone());

        let err = dispatcher
            .try_dispatch(&RawMessage::new("irssi/hilight", "[truncated"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Parse { .. }));
        assert_eq!(runner.get_render_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_payload_is_skipped() {
        let runner = Arc::new(MockRunner::new("notify"));
        let dispatcher = dispatcher_with(runner.clone());

        let result = dispatcher.dispatch(RawMessage::new("irssi/pm", "")).await;
        assert_eq!(result, DispatchResult::Skipped("empty request".to_string()));
        assert_eq!(runner.get_render_count(), 0);
    }

    #[tokio::test]
    async fn test_dry_run() {
        let runner = Arc::new(MockRunner::new("notify"));
        let dispatcher = dispatcher_with(runner.clone()).with_dry_run(true);

        let result = dispatcher.dispatch(RawMessage::new("irssi/pm", "(a) b")).await;
        assert_eq!(result, DispatchResult::Skipped("dry-run".to_string()));
        assert_eq!(runner.get_render_count(), 0); // 不应该实际渲染
    }

    #[tokio::test]
    async fn test_render_failure_is_reported() {
        let runner = Arc::new(MockRunner::failing("notify"));
        let dispatcher = dispatcher_with(runner.clone());

        let err = dispatcher
            .try_dispatch(&RawMessage::new("irssi/pm", "(a) b"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Render { .. }));
    }

    #[tokio::test]
    async fn test_route_config_reaches_parser() {
        let mut dispatcher = NotificationDispatcher::new();
        dispatcher.register_parser(Arc::new(IrssiParser::new()));
        let config = PluginConfig::new().with("urgency", "critical");
        dispatcher.add_route(
            Route::new(TopicFilter::new("#").unwrap(), "irssi").with_config(config.clone()),
        );

        let req = dispatcher
            .prepare(&RawMessage::new("irssi", "[a] b"), None)
            .unwrap();
        assert_eq!(req.config, Some(config));
    }

    #[tokio::test]
    async fn test_run_processes_all_messages() {
        let runner = Arc::new(MockRunner::new("notify"));
        let dispatcher = Arc::new(dispatcher_with(runner.clone()));
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn(dispatcher.run(rx));
        tx.send(RawMessage::new("irssi/pm", "(a) b")).await.unwrap();
        tx.send(RawMessage::new("mail/x", "unroutable runner")).await.unwrap();
        tx.send(RawMessage::new("nowhere", "no parser")).await.unwrap();
        tx.send(RawMessage::new("irssi/pm", "")).await.unwrap();
        tx.send(RawMessage::new("irssi/hilight", "[c] d")).await.unwrap();
        drop(tx);

        let stats = handle.await.unwrap();
        assert_eq!(
            stats,
            DispatchStats {
                delivered: 2,
                skipped: 1,
                failed: 2
            }
        );
        assert_eq!(runner.get_render_count(), 2);
    }
}
