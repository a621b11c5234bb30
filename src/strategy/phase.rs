//! 脚本化策略的阶段

use std::fmt;

/// 阶段按固定顺序推进：Init → Stage → Guard → Purchase → Attack → Done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// 识别阵营、拉取初始快照、归类角色槽位
    Init,
    /// 向集结点移动，等待迭代计数达到阈值
    Stage,
    /// 切换为 GuardMode，等待现金超过阈值
    Guard,
    /// 购买新单位并从快照中找回其 ID
    Purchase,
    /// 为新单位安装 AttackMove（以及可选的增援轮次）
    Attack,
    Done,
}

impl Phase {
    pub fn next(self) -> Phase {
        match self {
            Phase::Init => Phase::Stage,
            Phase::Stage => Phase::Guard,
            Phase::Guard => Phase::Purchase,
            Phase::Purchase => Phase::Attack,
            Phase::Attack | Phase::Done => Phase::Done,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Stage => "stage",
            Phase::Guard => "guard",
            Phase::Purchase => "purchase",
            Phase::Attack => "attack",
            Phase::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
