//! `mqtt-notify run` - 持续读取 stdin 并分发

use anyhow::Result;
use clap::Args;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::bootstrap::{GlobalArgs, Pipeline};
use crate::notification::DispatchStats;
use crate::source::forward_lines;

/// run 命令参数
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// 输入缓冲的消息条数
    #[arg(long, default_value = "64")]
    pub queue: usize,
}

/// 处理 run 命令：每行 `<topic> <payload>`，直到 EOF
pub async fn handle_run(args: RunArgs, global: &GlobalArgs) -> Result<DispatchStats> {
    let config = global.load_config()?;
    let pipeline = Pipeline::start(&config)?;

    let (sender, receiver) = mpsc::channel(args.queue.max(1));
    let dispatch = tokio::spawn(pipeline.dispatcher.clone().run(receiver));

    info!("Reading messages from stdin");
    match forward_lines(BufReader::new(tokio::io::stdin()), sender).await {
        Ok(count) => info!(count, "Input finished"),
        Err(e) => warn!(error = %e, "Failed reading stdin"),
    }

    let stats = dispatch.await?;
    pipeline.shutdown().await;
    Ok(stats)
}
