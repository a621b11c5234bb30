//! 游戏 API：命令词表到传输层的直通封装
//!
//! 每个操作只是「渲染命令 → command → trim 回复」。需要结构化结果时使用 world / tank /
//! *_target_list，这些方法在 JSON 解析失败时返回 `ClientError::Protocol`。

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::core::ClientError;
use crate::protocol::{Command, TargetFilters};
use crate::transport::CommandTransport;
use crate::world::{MacroName, Side, TankId, TankRecord, Target, WeaponKind, WorldSnapshot};

/// 基于任意 CommandTransport 的游戏客户端，可在多个任务间克隆共享
#[derive(Clone)]
pub struct GameApi {
    transport: Arc<dyn CommandTransport>,
}

impl GameApi {
    pub fn new(transport: Arc<dyn CommandTransport>) -> Self {
        Self { transport }
    }

    /// 发送一条命令并返回 trim 后的回复
    pub async fn send(&self, command: &Command) -> Result<String, ClientError> {
        let reply = self.transport.command(&command.to_string()).await?;
        Ok(reply.trim().to_string())
    }

    async fn send_json<T: DeserializeOwned>(&self, command: &Command) -> Result<T, ClientError> {
        let reply = self.send(command).await?;
        serde_json::from_str(&reply).map_err(|e| {
            ClientError::protocol(command.verb(), format!("{} (reply: {})", e, preview(&reply)))
        })
    }

    // ---------------- GETTER ----------------

    /// 当前连接控制的阵营（red / blue）
    pub async fn my_name(&self) -> Result<String, ClientError> {
        self.send(&Command::MyName).await
    }

    pub async fn side(&self) -> Result<Side, ClientError> {
        Ok(Side::parse(&self.my_name().await?))
    }

    /// 世界状态 JSON
    pub async fn game_status(&self) -> Result<String, ClientError> {
        self.send(&Command::GameStatus).await
    }

    pub async fn world(&self) -> Result<WorldSnapshot, ClientError> {
        self.send_json(&Command::GameStatus).await
    }

    /// 单个坦克的状态 JSON
    pub async fn tank_status(&self, id: &TankId) -> Result<String, ClientError> {
        self.send(&Command::TankStatus { id: id.clone() }).await
    }

    pub async fn tank(&self, id: &TankId) -> Result<TankRecord, ClientError> {
        self.send_json(&Command::TankStatus { id: id.clone() }).await
    }

    /// 理论上在射程内的目标，按距离排序（忽略武器类型与车身角度）
    pub async fn close_targets(
        &self,
        id: &TankId,
        filters: &TargetFilters,
    ) -> Result<String, ClientError> {
        self.send(&Command::CloseTargets {
            id: id.clone(),
            filters: filters.clone(),
        })
        .await
    }

    pub async fn close_target_list(
        &self,
        id: &TankId,
        filters: &TargetFilters,
    ) -> Result<Vec<Target>, ClientError> {
        self.send_json(&Command::CloseTargets {
            id: id.clone(),
            filters: filters.clone(),
        })
        .await
    }

    /// 实际可攻击的目标，按所需转角排序
    pub async fn possible_targets(
        &self,
        id: &TankId,
        filters: &TargetFilters,
    ) -> Result<String, ClientError> {
        self.send(&Command::PossibleTargets {
            id: id.clone(),
            filters: filters.clone(),
        })
        .await
    }

    pub async fn possible_target_list(
        &self,
        id: &TankId,
        filters: &TargetFilters,
    ) -> Result<Vec<Target>, ClientError> {
        self.send_json(&Command::PossibleTargets {
            id: id.clone(),
            filters: filters.clone(),
        })
        .await
    }

    // ---------------- SETTER ----------------

    /// 关闭服务器（仅测试用）
    pub async fn exit(&self) -> Result<String, ClientError> {
        self.send(&Command::Exit).await
    }

    /// 购买新单位，服务器负责放置
    pub async fn buy_tank(
        &self,
        armor: i32,
        damage: i32,
        weapon: WeaponKind,
    ) -> Result<String, ClientError> {
        self.send(&Command::BuyTank {
            armor,
            damage,
            weapon,
        })
        .await
    }

    /// 按角度与距离开火；主炮只能沿车身方向射击
    pub async fn fire(&self, id: &TankId, angle: i32, distance: i32) -> Result<String, ClientError> {
        self.send(&Command::Fire {
            id: id.clone(),
            angle,
            distance,
        })
        .await
    }

    /// 向坐标开火，服务器换算成角度与距离
    pub async fn fire_at(&self, id: &TankId, x: i64, y: i64) -> Result<String, ClientError> {
        self.send(&Command::FireAt { id: id.clone(), x, y }).await
    }

    pub async fn forward(&self, id: &TankId) -> Result<String, ClientError> {
        self.send(&Command::Forward { id: id.clone() }).await
    }

    pub async fn backward(&self, id: &TankId) -> Result<String, ClientError> {
        self.send(&Command::Backward { id: id.clone() }).await
    }

    /// 停车；武器只有在静止时才会蓄力
    pub async fn stop(&self, id: &TankId) -> Result<String, ClientError> {
        self.send(&Command::Stop { id: id.clone() }).await
    }

    /// 左转 45°
    pub async fn left(&self, id: &TankId) -> Result<String, ClientError> {
        self.send(&Command::Left { id: id.clone() }).await
    }

    /// 右转 45°
    pub async fn right(&self, id: &TankId) -> Result<String, ClientError> {
        self.send(&Command::Right { id: id.clone() }).await
    }

    /// 安装 MoveTo 宏，单位每个 tick 向 (x, y) 移动
    pub async fn set_macro_move_to(&self, id: &TankId, x: i64, y: i64) -> Result<String, ClientError> {
        self.send(&Command::SetMacroMoveTo { id: id.clone(), x, y }).await
    }

    /// 安装常驻宏，直到被替换
    pub async fn set_macro(&self, id: &TankId, name: MacroName) -> Result<String, ClientError> {
        self.send(&Command::SetMacro { id: id.clone(), name }).await
    }
}

fn preview(reply: &str) -> String {
    if reply.len() > 200 {
        format!("{}...", reply.chars().take(200).collect::<String>())
    } else {
        reply.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedTransport;

    fn api_with(transport: Arc<ScriptedTransport>) -> GameApi {
        GameApi::new(transport)
    }

    #[tokio::test]
    async fn test_pass_through_trims_reply() {
        let transport = Arc::new(ScriptedTransport::new(|cmd| match cmd {
            "MyName" => Ok("  blue ".to_string()),
            _ => Ok("ok".to_string()),
        }));
        let api = api_with(transport.clone());

        assert_eq!(api.my_name().await.unwrap(), "blue");
        assert_eq!(api.side().await.unwrap(), Side::Blue);
        assert_eq!(api.stop(&TankId::new("4")).await.unwrap(), "ok");
        assert_eq!(
            api.fire_at(&TankId::new("4"), 10, 20).await.unwrap(),
            "ok"
        );
        assert_eq!(
            transport.sent(),
            vec!["MyName", "MyName", "Stop 4", "FireAt 4 10 20"]
        );
    }

    #[tokio::test]
    async fn test_world_malformed_json_is_protocol_error() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok("err: invalid world status".to_string())
        }));
        let api = api_with(transport);

        let err = api.world().await.unwrap_err();
        match err {
            ClientError::Protocol { command, message } => {
                assert_eq!(command, "GameStatus");
                assert!(message.contains("invalid world status"));
            }
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_typed_targets_and_tank() {
        let transport = Arc::new(ScriptedTransport::new(|cmd| {
            if cmd.starts_with("PossibleTargets") {
                Ok(r#"[{"tankID":"12","distance":80,"relativeAngle":-45}]"#.to_string())
            } else {
                Ok(r#"{"id":"3","owner":"red","weapon":{"typ":"RocketLauncher"}}"#.to_string())
            }
        }));
        let api = api_with(transport.clone());

        let filters = TargetFilters::excluding_own(&Side::Red);
        let targets = api
            .possible_target_list(&TankId::new("3"), &filters)
            .await
            .unwrap();
        assert_eq!(targets[0].tank_id, TankId::new("12"));
        assert_eq!(targets[0].relative_angle, -45);

        let tank = api.tank(&TankId::new("3")).await.unwrap();
        assert_eq!(tank.weapon_kind(), Some(WeaponKind::RocketLauncher));
        assert_eq!(transport.count("TankStatus"), 1);
    }
}
