//! mqtt-notify CLI
//!
//! 把 pub/sub 消息（irssi-mqtt-notify 等）显示为桌面通知

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use mqtt_notify::cli::{
    handle_parse, handle_run, handle_send, GlobalArgs, ParseArgs, RunArgs, SendArgs,
};

#[derive(Parser)]
#[command(name = "mqtt-notify")]
#[command(about = "mqtt-notify - 把 pub/sub 消息显示为桌面通知")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 从 stdin 读取 `<topic> <payload>` 行并持续分发（配合 mosquitto_sub -v）
    Run(RunArgs),
    /// 分发单条消息
    Send(SendArgs),
    /// 只解析消息并输出 JSON
    Parse(ParseArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mqtt_notify=info,mqtt-notify=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let stats = handle_run(args, &cli.global).await?;
            info!(
                delivered = stats.delivered,
                skipped = stats.skipped,
                failed = stats.failed,
                "Done"
            );
        }
        Commands::Send(args) => {
            let result = handle_send(args, &cli.global).await?;
            info!(?result, "Message dispatched");
        }
        Commands::Parse(args) => {
            let req = handle_parse(args, &cli.global)?;
            println!("{}", serde_json::to_string_pretty(&req)?);
        }
    }

    Ok(())
}
