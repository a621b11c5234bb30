//! 服务器 JSON 的反序列化结构
//!
//! 只声明决策循环关心的字段，未知字段一律忽略，缺失的可选字段取默认值。
//! 每次轮询都整体重建，快照之间除了 id 之外没有关联。

use serde::Deserialize;

use super::{TankId, WeaponKind};

/// GameStatus 回复
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldSnapshot {
    pub iteration: u64,
    pub cash_red: f64,
    pub cash_blue: f64,
    pub screen_width: f64,
    pub screen_height: f64,
    pub x_width: i64,
    pub y_height: i64,
    pub freeze: bool,
    pub unit_count_red: i64,
    pub unit_count_blue: i64,
    pub tanks: Vec<TankRecord>,
}

impl WorldSnapshot {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 任一方现金超过阈值
    pub fn any_cash_above(&self, threshold: f64) -> bool {
        self.cash_red > threshold || self.cash_blue > threshold
    }

    /// 某一方的现金；非 red / blue 的阵营没有现金
    pub fn cash_of(&self, side: &str) -> f64 {
        match side {
            "red" => self.cash_red,
            "blue" => self.cash_blue,
            _ => 0.0,
        }
    }

    /// `owner` 拥有的全部单位
    pub fn owned_by<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a TankRecord> + 'a {
        self.tanks.iter().filter(move |t| t.owner == owner)
    }

    pub fn tank(&self, id: &TankId) -> Option<&TankRecord> {
        self.tanks.iter().find(|t| &t.id == id)
    }
}

/// 单个坦克（也用于 TankStatus 回复）
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TankRecord {
    pub id: TankId,
    pub owner: String,
    #[serde(default)]
    pub weapon: WeaponInfo,
    #[serde(default)]
    pub health: i64,
    #[serde(default)]
    pub armor: i64,
    #[serde(default)]
    pub speed: i64,
    #[serde(default)]
    pub pos: Position,
    #[serde(default)]
    pub angle: i64,
    #[serde(default)]
    pub alive: bool,
    #[serde(default)]
    pub moving: bool,
    #[serde(default)]
    pub active_macro: bool,
}

impl TankRecord {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 武器类型；未知的类型名返回 None
    pub fn weapon_kind(&self) -> Option<WeaponKind> {
        serde_json::from_value(serde_json::Value::String(self.weapon.typ.clone())).ok()
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WeaponInfo {
    pub typ: String,
    pub rng: i64,
    pub damage: i64,
    pub rdy: bool,
    pub status: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

/// CloseTargets / PossibleTargets 列表中的一项
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(rename = "tankID")]
    pub tank_id: TankId,
    #[serde(default)]
    pub distance: i64,
    #[serde(default)]
    pub relative_angle: i64,
}

impl Target {
    pub fn parse_list(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}
