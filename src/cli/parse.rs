//! `mqtt-notify parse` - 只解析，输出 NotificationRequest JSON

use anyhow::Result;
use clap::Args;

use super::bootstrap::GlobalArgs;
use crate::notification::{NotificationBuilder, NotificationRequest, RawMessage};

/// parse 命令参数
#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// 消息 topic
    #[arg(long, short)]
    pub topic: String,
    /// 消息内容
    #[arg(long, short)]
    pub payload: String,
    /// 指定 parser（默认按 topic 路由）
    #[arg(long)]
    pub parser: Option<String>,
}

pub fn handle_parse(args: ParseArgs, global: &GlobalArgs) -> Result<NotificationRequest> {
    let config = global.load_config()?;
    let dispatcher = NotificationBuilder::from_config(&config).build();

    let msg = RawMessage::new(args.topic, args.payload);
    let req = dispatcher.prepare(&msg, args.parser.as_deref())?;
    Ok(req)
}
