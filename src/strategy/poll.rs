//! 带固定间隔的世界状态轮询
//!
//! 这是决策循环唯一的同步原语：等待的是服务器维护的外部计数器，不是本地定时器。
//! 没有超时，谓词永不满足时会一直阻塞。

use std::time::Duration;

use crate::api::GameApi;
use crate::core::ClientError;
use crate::world::WorldSnapshot;

/// 轮询结束时的快照与拉取次数
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub world: WorldSnapshot,
    pub polls: usize,
}

/// 拉取快照直到 `done` 返回 true；每次不满足时休眠 `interval` 后再拉取
pub async fn poll_until<F>(
    api: &GameApi,
    interval: Duration,
    mut done: F,
) -> Result<PollOutcome, ClientError>
where
    F: FnMut(&WorldSnapshot) -> bool,
{
    let mut polls = 0;
    loop {
        let world = api.world().await?;
        polls += 1;
        if done(&world) {
            return Ok(PollOutcome { world, polls });
        }
        tracing::debug!(
            iteration = world.iteration,
            cash_red = world.cash_red,
            cash_blue = world.cash_blue,
            polls,
            "condition not met, waiting"
        );
        tokio::time::sleep(interval).await;
    }
}
