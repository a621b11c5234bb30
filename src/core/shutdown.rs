//! 优雅关闭处理
//!
//! 决策循环本身没有取消语义（轮询谓词永不满足时会一直阻塞），
//! 进程级的 Ctrl+C / SIGTERM 由这里统一监听：取消策略 future，然后关闭连接。

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::transport::TcpClient;

/// 关闭信号管理器
#[derive(Clone)]
pub struct ShutdownManager {
    shutdown_token: CancellationToken,
    reason_tx: broadcast::Sender<ShutdownReason>,
}

/// 关闭原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Ctrl+C
    UserInitiated,
    /// SIGTERM
    Signal,
}

impl ShutdownManager {
    pub fn new() -> Self {
        let (reason_tx, _) = broadcast::channel(1);
        Self {
            shutdown_token: CancellationToken::new(),
            reason_tx,
        }
    }

    /// 触发关闭
    pub fn shutdown(&self, reason: ShutdownReason) {
        let _ = self.reason_tx.send(reason);
        self.shutdown_token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// 订阅关闭原因
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownReason> {
        self.reason_tx.subscribe()
    }

    pub async fn wait_for_shutdown(&self) {
        self.shutdown_token.cancelled().await;
    }

    /// 安装系统信号处理器 (Ctrl+C, SIGTERM)
    pub fn install_signal_handlers(self: &Arc<Self>) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                tracing::info!("Received Ctrl+C, stopping strategy...");
                manager.shutdown(ShutdownReason::UserInitiated);
            }
        });

        #[cfg(unix)]
        {
            let manager = Arc::clone(self);
            tokio::spawn(async move {
                use tokio::signal::unix::{signal, SignalKind};
                if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                    sigterm.recv().await;
                    tracing::info!("Received SIGTERM, stopping strategy...");
                    manager.shutdown(ShutdownReason::Signal);
                }
            });
        }
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 运行策略直到结束或收到关闭信号；两种情况下都会关闭连接
///
/// 返回 `Ok(output)` 表示策略自行结束，`Err(reason)` 表示被关闭信号打断。
/// 调用前就已触发的关闭没有可读的原因，按 `UserInitiated` 处理。
pub async fn run_with_graceful_shutdown<F, T>(
    shutdown_manager: Arc<ShutdownManager>,
    client: Arc<TcpClient>,
    app: F,
) -> Result<T, ShutdownReason>
where
    F: Future<Output = T>,
{
    let mut reason_rx = shutdown_manager.subscribe();
    shutdown_manager.install_signal_handlers();

    let output = tokio::select! {
        out = app => {
            tracing::info!("Strategy finished");
            Ok(out)
        }
        _ = shutdown_manager.wait_for_shutdown() => {
            let reason = reason_rx.try_recv().unwrap_or(ShutdownReason::UserInitiated);
            tracing::info!(reason = ?reason, "Shutdown signal received");
            Err(reason)
        }
    };

    client.close().await;
    output
}
