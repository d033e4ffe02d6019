//! mqtt-notify - 把 pub/sub 消息解析为桌面通知

pub mod cli;
pub mod config;
pub mod notification;
pub mod source;

pub use config::AppConfig;
pub use notification::{
    Backend, BackendOptions, DispatchError, DispatchResult, DispatchStats, IrssiFormat,
    IrssiParser, NotificationBackend, NotificationBuilder, NotificationDispatcher,
    NotificationRequest, NotifyRunner, Parser, PassthroughParser, Payload, PluginConfig,
    RawMessage, Route, Runner, TopicFilter, Urgency,
};
