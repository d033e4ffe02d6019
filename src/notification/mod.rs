//! 通知管道 - 把总线消息解析为通知请求并交给 runner 渲染
//!
//! # 设计目标
//! 1. Parser 插件：每种生产者格式一个 `Parser`，输出统一的 `NotificationRequest`
//! 2. Runner 插件：每种展示后端一个 `Runner`
//! 3. 路由：`NotificationDispatcher` 按 topic 选 parser，按请求的 `runner` 字段选 runner
//! 4. 容错：单条消息失败只记录日志，不影响后续消息
//!
//! # 使用示例
//! ```ignore
//! use mqtt_notify::notification::{
//!     BackendOptions, NotificationBackend, NotificationBuilder, RawMessage,
//! };
//!
//! let backend = Arc::new(NotificationBackend::open(BackendOptions::new("mqtt-notify"))?);
//! let dispatcher = NotificationBuilder::from_config(&config).backend(backend).build();
//!
//! dispatcher.dispatch(RawMessage::new("irssi/hilight", "[#rust/bob] ping")).await;
//! ```

pub mod backend;
pub mod builder;
pub mod dispatcher;
pub mod error;
pub mod icon;
pub mod parser;
pub mod parsers;
pub mod plugin_config;
pub mod request;
pub mod runner;
pub mod runners;
pub mod topic;
pub mod urgency;

pub use backend::{Backend, BackendOptions, DesktopNotification, NotificationBackend};
pub use builder::NotificationBuilder;
pub use dispatcher::{DispatchResult, DispatchStats, NotificationDispatcher, Route};
pub use error::{ConfigError, DispatchError, EncodingError, ParseError, RenderError};
pub use icon::Icon;
pub use parser::Parser;
pub use parsers::{IrssiFormat, IrssiParser, PassthroughParser};
pub use plugin_config::PluginConfig;
pub use request::{NotificationRequest, Payload, RawMessage};
pub use runner::Runner;
pub use runners::{NotifyRunner, NOTIFY_RUNNER};
pub use topic::TopicFilter;
pub use urgency::Urgency;
