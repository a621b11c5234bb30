//! 脚本化策略：集结 → 防守 → 购买 → 进攻
//!
//! 每个阶段一个方法，`step` 执行当前阶段并推进到下一阶段，`run` 一直推进到 Done。
//! 任一阶段出现传输 / 协议错误都会终止整个策略（没有恢复路径），错误中带有失败的阶段。
//! 服务器回复的 `err: ...` 只记录日志，不视为失败。

use async_trait::async_trait;

use crate::api::GameApi;
use crate::config::{MissingUnitPolicy, StrategySection};
use crate::core::{ClientError, StrategyError};
use crate::protocol::{Command, Reply};
use crate::strategy::{poll_until, Phase, Strategy};
use crate::world::{discover_new, MacroName, RoleSlots, Side, TankId, WorldSnapshot};

/// 策略结束时的汇总
#[derive(Debug, Clone)]
pub struct StrategyReport {
    pub side: Side,
    pub slots: RoleSlots,
    /// Purchase 阶段买到的单位（找不到时为哨兵）
    pub purchased: TankId,
    /// 增援轮次中买到的单位
    pub reinforcements: Vec<TankId>,
    /// 整个过程中 GameStatus 的拉取次数
    pub polls: usize,
    pub last_iteration: u64,
}

/// 按固定脚本驱动己方单位
pub struct ScriptedStrategy {
    api: GameApi,
    config: StrategySection,
    phase: Phase,
    side: Side,
    world: WorldSnapshot,
    slots: RoleSlots,
    purchased: TankId,
    reinforcements: Vec<TankId>,
    polls: usize,
}

impl ScriptedStrategy {
    pub fn new(api: GameApi, config: StrategySection) -> Self {
        Self {
            api,
            config,
            phase: Phase::Init,
            side: Side::Other(String::new()),
            world: WorldSnapshot::default(),
            slots: RoleSlots::default(),
            purchased: TankId::sentinel(),
            reinforcements: Vec::new(),
            polls: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn side(&self) -> &Side {
        &self.side
    }

    pub fn slots(&self) -> &RoleSlots {
        &self.slots
    }

    pub fn purchased(&self) -> &TankId {
        &self.purchased
    }

    /// 最近一次拉取的快照
    pub fn world(&self) -> &WorldSnapshot {
        &self.world
    }

    pub fn polls(&self) -> usize {
        self.polls
    }

    /// 执行当前阶段，成功后推进并返回新阶段
    pub async fn step(&mut self) -> Result<Phase, StrategyError> {
        let phase = self.phase;
        if phase == Phase::Done {
            return Ok(Phase::Done);
        }
        tracing::info!(phase = %phase, "entering phase");
        match phase {
            Phase::Init => self.init().await?,
            Phase::Stage => self.stage().await?,
            Phase::Guard => self.guard().await?,
            Phase::Purchase => self.purchase().await?,
            Phase::Attack => self.attack().await?,
            Phase::Done => {}
        }
        self.phase = phase.next();
        Ok(self.phase)
    }

    fn fail(&self, source: ClientError) -> StrategyError {
        StrategyError::Client {
            phase: self.phase,
            source,
        }
    }

    /// 拉取快照并计入 polls
    async fn refresh(&mut self) -> Result<(), StrategyError> {
        let world = self.api.world().await.map_err(|e| self.fail(e))?;
        self.world = world;
        self.polls += 1;
        Ok(())
    }

    async fn wait_until<F>(&mut self, done: F) -> Result<(), StrategyError>
    where
        F: FnMut(&WorldSnapshot) -> bool,
    {
        let outcome = poll_until(&self.api, self.config.poll_interval(), done)
            .await
            .map_err(|e| self.fail(e))?;
        self.polls += outcome.polls;
        self.world = outcome.world;
        Ok(())
    }

    /// 向某个角色的单位发送命令；哨兵 ID 按 missing_unit 策略处理
    async fn issue(&self, role: &str, command: Command) -> Result<(), StrategyError> {
        if let Some(id) = command.target() {
            if id.is_sentinel() {
                match self.config.missing_unit {
                    MissingUnitPolicy::Send => {
                        tracing::warn!(role, command = %command, "sending command to sentinel id");
                    }
                    MissingUnitPolicy::Skip => {
                        tracing::warn!(role, command = %command, "no unit fills role, command skipped");
                        return Ok(());
                    }
                    MissingUnitPolicy::Abort => {
                        return Err(StrategyError::MissingUnit {
                            phase: self.phase,
                            role: role.to_string(),
                        });
                    }
                }
            }
        }

        let reply = self.api.send(&command).await.map_err(|e| self.fail(e))?;
        match Reply::parse(&reply) {
            Reply::Err(msg) => {
                tracing::warn!(role, command = %command, error = %msg, "server rejected command")
            }
            _ => tracing::info!(role, command = %command, reply = %reply, "command accepted"),
        }
        Ok(())
    }

    /// Init：识别阵营、拉取初始快照、归类角色
    pub async fn init(&mut self) -> Result<(), StrategyError> {
        self.side = self.api.side().await.map_err(|e| self.fail(e))?;
        self.refresh().await?;
        self.slots = RoleSlots::classify(&self.world, self.side.as_str());
        tracing::info!(
            side = %self.side,
            cannon = %self.slots.cannon,
            rocket = %self.slots.rocket,
            "classified units"
        );
        Ok(())
    }

    /// 集结点：屏幕中心水平偏移 stage_offset（红方向左，其余向右）
    pub fn staging_point(&self) -> (i64, i64) {
        let x = (self.world.screen_width / 2.0) as i64
            + self.side.stage_direction() * self.config.stage_offset;
        let y = (self.world.screen_height / 2.0) as i64;
        (x, y)
    }

    /// Stage：安装 MoveTo 宏，等待迭代计数达到 stage_iteration
    pub async fn stage(&mut self) -> Result<(), StrategyError> {
        let (x, y) = self.staging_point();
        for (role, id) in self.slots.entries() {
            let command = Command::SetMacroMoveTo { id: id.clone(), x, y };
            self.issue(role, command).await?;
        }

        let threshold = self.config.stage_iteration;
        self.wait_until(|w| w.iteration >= threshold).await?;
        tracing::info!(iteration = self.world.iteration, "units staged");
        Ok(())
    }

    /// Guard：切换为 GuardMode，等待任一方现金超过 cash_threshold
    pub async fn guard(&mut self) -> Result<(), StrategyError> {
        for (role, id) in self.slots.entries() {
            let command = Command::SetMacro {
                id: id.clone(),
                name: MacroName::GuardMode,
            };
            self.issue(role, command).await?;
        }

        let threshold = self.config.cash_threshold as f64;
        self.wait_until(|w| w.any_cash_above(threshold)).await?;
        tracing::info!(
            cash_red = self.world.cash_red,
            cash_blue = self.world.cash_blue,
            "cash threshold reached"
        );
        Ok(())
    }

    /// 购买一个单位并通过前后快照的差集找回它的 ID
    async fn buy_and_discover(&mut self) -> Result<TankId, StrategyError> {
        let purchase = &self.config.purchase;
        let command = Command::BuyTank {
            armor: purchase.armor,
            damage: purchase.damage,
            weapon: purchase.weapon,
        };
        let weapon = purchase.weapon;
        let reply = self.api.send(&command).await.map_err(|e| self.fail(e))?;
        if let Reply::Err(msg) = Reply::parse(&reply) {
            tracing::warn!(command = %command, error = %msg, "purchase rejected");
        }

        let before = self.world.clone();
        self.refresh().await?;
        let id = discover_new(&before, &self.world, self.side.as_str(), weapon);
        tracing::info!(role = weapon.role(), id = %id, "purchased unit");
        Ok(id)
    }

    /// Purchase：买入配置的单位
    pub async fn purchase(&mut self) -> Result<(), StrategyError> {
        self.purchased = self.buy_and_discover().await?;
        Ok(())
    }

    /// Attack：新单位切到 AttackMove；可选让初始单位一起进攻，并执行增援轮次
    pub async fn attack(&mut self) -> Result<(), StrategyError> {
        let role = self.config.purchase.weapon.role();
        let command = Command::SetMacro {
            id: self.purchased.clone(),
            name: MacroName::AttackMove,
        };
        self.issue(role, command).await?;

        if self.config.attack_with_all {
            for (role, id) in self.slots.entries() {
                let command = Command::SetMacro {
                    id: id.clone(),
                    name: MacroName::AttackMove,
                };
                self.issue(role, command).await?;
            }
        }

        // 增援只看己方现金，服务器按阵营扣款
        let threshold = self.config.cash_threshold as f64;
        let side = self.side.clone();
        for round in 0..self.config.reinforcements {
            self.wait_until(|w| w.cash_of(side.as_str()) > threshold).await?;
            let id = self.buy_and_discover().await?;
            tracing::info!(round, id = %id, "reinforcement arrived");
            self.reinforcements.push(id);

            let idle: Vec<TankId> = self
                .world
                .owned_by(self.side.as_str())
                .filter(|t| !t.active_macro)
                .map(|t| t.id.clone())
                .collect();
            for id in idle {
                let command = Command::SetMacro {
                    id,
                    name: MacroName::AttackMove,
                };
                self.issue("idle", command).await?;
            }
        }
        Ok(())
    }

    fn report(&self) -> StrategyReport {
        StrategyReport {
            side: self.side.clone(),
            slots: self.slots.clone(),
            purchased: self.purchased.clone(),
            reinforcements: self.reinforcements.clone(),
            polls: self.polls,
            last_iteration: self.world.iteration,
        }
    }
}

#[async_trait]
impl Strategy for ScriptedStrategy {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn run(&mut self) -> Result<StrategyReport, StrategyError> {
        while self.phase != Phase::Done {
            if let Err(e) = self.step().await {
                tracing::error!(phase = %e.phase(), error = %e, "strategy aborted");
                return Err(e);
            }
        }
        Ok(self.report())
    }
}
