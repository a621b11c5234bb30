//! 决策层：阶段状态机、世界状态轮询、脚本化策略
//!
//! 决策循环运行在单个顺序任务中，只通过 GameApi 与服务器交互；
//! 其他策略实现 Strategy trait 即可替换内置的 ScriptedStrategy。

pub mod phase;
pub mod poll;
pub mod scripted;

use async_trait::async_trait;

use crate::core::StrategyError;

pub use phase::Phase;
pub use poll::{poll_until, PollOutcome};
pub use scripted::{ScriptedStrategy, StrategyReport};

/// 可插拔的决策策略
#[async_trait]
pub trait Strategy: Send {
    /// 策略名（日志用）
    fn name(&self) -> &'static str;

    /// 运行到结束；任一步失败即终止
    async fn run(&mut self) -> Result<StrategyReport, StrategyError>;
}
