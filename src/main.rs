//! TankWars 客户端
//!
//! 入口：加载配置、初始化日志、连接服务器，运行脚本化策略直到结束或收到 Ctrl+C / SIGTERM。
//! 用法：`tankwars [config.toml]`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tankwars::config::load_config;
use tankwars::core::{run_with_graceful_shutdown, ShutdownManager};
use tankwars::{observability, GameApi, ScriptedStrategy, Strategy, TcpClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path).context("Failed to load config")?;

    let server = &cfg.server;
    let client = TcpClient::connect(&server.host, server.port, server.connect_timeout())
        .await
        .context("Failed to connect to game server")?;
    let client = Arc::new(client);

    let api = GameApi::new(client.clone());
    let mut strategy = ScriptedStrategy::new(api, cfg.strategy.clone());
    tracing::info!(strategy = strategy.name(), "starting strategy");

    let shutdown = Arc::new(ShutdownManager::new());
    match run_with_graceful_shutdown(shutdown, client, strategy.run()).await {
        Ok(result) => {
            let report = result.context("Strategy failed")?;
            tracing::info!(
                side = %report.side,
                purchased = %report.purchased,
                polls = report.polls,
                iteration = report.last_iteration,
                "strategy completed"
            );
        }
        Err(reason) => tracing::info!(reason = ?reason, "stopped before strategy completed"),
    }

    Ok(())
}
