//! `mqtt-notify send` - 分发单条消息

use anyhow::{bail, Result};
use clap::Args;

use super::bootstrap::{GlobalArgs, Pipeline};
use crate::notification::{DispatchResult, RawMessage};

/// send 命令参数
#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// 消息 topic
    #[arg(long, short)]
    pub topic: String,
    /// 消息内容
    #[arg(long, short)]
    pub payload: String,
}

pub async fn handle_send(args: SendArgs, global: &GlobalArgs) -> Result<DispatchResult> {
    let config = global.load_config()?;
    let pipeline = Pipeline::start(&config)?;

    let result = pipeline
        .dispatcher
        .dispatch(RawMessage::new(args.topic, args.payload))
        .await;
    pipeline.shutdown().await;

    if let DispatchResult::Failed(reason) = &result {
        bail!("Message not delivered: {}", reason);
    }
    Ok(result)
}
