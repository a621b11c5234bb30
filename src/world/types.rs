//! 协议中的基础标识：坦克 ID、阵营、武器类型、宏名称

use std::fmt;

use serde::{Deserialize, Serialize};

/// 坦克标识：服务器分配的不透明句柄，客户端从不解析
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TankId(String);

impl TankId {
    /// 「该角色没有单位」的占位值
    pub const SENTINEL: &'static str = "-1";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn sentinel() -> Self {
        Self(Self::SENTINEL.to_string())
    }

    pub fn is_sentinel(&self) -> bool {
        self.0 == Self::SENTINEL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TankId {
    fn default() -> Self {
        Self::sentinel()
    }
}

impl fmt::Display for TankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 阵营：MyName 返回 red / blue，其余（如 observer-1）原样保留
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Red,
    Blue,
    Other(String),
}

impl Side {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "red" => Side::Red,
            "blue" => Side::Blue,
            other => Side::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Side::Red => "red",
            Side::Blue => "blue",
            Side::Other(name) => name,
        }
    }

    /// 集结点偏移方向：红方在中心左侧，其余在右侧
    pub fn stage_direction(&self) -> i64 {
        match self {
            Side::Red => -1,
            _ => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 武器类型（对应 weapon.typ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// 战车主炮（协议名 "Tank"）
    #[serde(rename = "Tank")]
    Cannon,
    #[serde(rename = "RocketLauncher")]
    RocketLauncher,
    #[serde(rename = "Artillery")]
    Artillery,
    /// 中立物体（岩石）
    #[serde(rename = "None")]
    None,
}

impl WeaponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Cannon => "Tank",
            WeaponKind::RocketLauncher => "RocketLauncher",
            WeaponKind::Artillery => "Artillery",
            WeaponKind::None => "None",
        }
    }

    /// 角色槽位名（日志用）
    pub fn role(&self) -> &'static str {
        match self {
            WeaponKind::Cannon => "cannon",
            WeaponKind::RocketLauncher => "rocket",
            WeaponKind::Artillery => "artillery",
            WeaponKind::None => "none",
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 服务器端每个 tick 都会重新执行的常驻宏
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroName {
    AttackMove,
    FireAndManeuver,
    FireWall,
    GuardMode,
    /// 移除当前宏
    Reset,
}

impl MacroName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MacroName::AttackMove => "AttackMove",
            MacroName::FireAndManeuver => "FireAndManeuver",
            MacroName::FireWall => "FireWall",
            MacroName::GuardMode => "GuardMode",
            MacroName::Reset => "nil",
        }
    }
}

impl fmt::Display for MacroName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_parse() {
        assert_eq!(Side::parse("red"), Side::Red);
        assert_eq!(Side::parse("blue\r"), Side::Blue);
        assert_eq!(Side::parse("observer-1"), Side::Other("observer-1".into()));
        assert_eq!(Side::Red.stage_direction(), -1);
        assert_eq!(Side::Blue.stage_direction(), 1);
    }

    #[test]
    fn test_weapon_kind_wire_names() {
        let kind: WeaponKind = serde_json::from_str("\"Tank\"").unwrap();
        assert_eq!(kind, WeaponKind::Cannon);
        assert_eq!(WeaponKind::RocketLauncher.to_string(), "RocketLauncher");
        assert_eq!(MacroName::Reset.to_string(), "nil");
    }

    #[test]
    fn test_tank_id_sentinel() {
        assert!(TankId::default().is_sentinel());
        assert!(!TankId::new("3").is_sentinel());
    }
}
