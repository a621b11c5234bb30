//! 命令词表
//!
//! 每个命令渲染为「动词 + 空格分隔的参数」，大小写敏感。

use std::fmt;

use crate::world::{MacroName, Side, TankId, WeaponKind};

/// CloseTargets / PossibleTargets 的 5 个过滤槽位（要忽略的 owner 标签），空位发送空字符串
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetFilters([String; 5]);

impl TargetFilters {
    pub fn new<I, S>(filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slots: [String; 5] = Default::default();
        for (slot, filter) in slots.iter_mut().zip(filters) {
            *slot = filter.into();
        }
        Self(slots)
    }

    /// 忽略己方单位、己方基地与所有岩石
    pub fn excluding_own(side: &Side) -> Self {
        Self::new([
            side.as_str().to_string(),
            format!("{}_base", side),
            "neutral_rock".to_string(),
            "red_rock".to_string(),
            "blue_rock".to_string(),
        ])
    }

    pub fn slots(&self) -> &[String; 5] {
        &self.0
    }
}

impl fmt::Display for TargetFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// 客户端可发送的全部命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    MyName,
    GameStatus,
    TankStatus { id: TankId },
    CloseTargets { id: TankId, filters: TargetFilters },
    PossibleTargets { id: TankId, filters: TargetFilters },
    /// 关闭服务器（仅测试用）
    Exit,
    BuyTank { armor: i32, damage: i32, weapon: WeaponKind },
    Fire { id: TankId, angle: i32, distance: i32 },
    FireAt { id: TankId, x: i64, y: i64 },
    Forward { id: TankId },
    Backward { id: TankId },
    Stop { id: TankId },
    Left { id: TankId },
    Right { id: TankId },
    SetMacroMoveTo { id: TankId, x: i64, y: i64 },
    SetMacro { id: TankId, name: MacroName },
}

impl Command {
    pub fn verb(&self) -> &'static str {
        match self {
            Command::MyName => "MyName",
            Command::GameStatus => "GameStatus",
            Command::TankStatus { .. } => "TankStatus",
            Command::CloseTargets { .. } => "CloseTargets",
            Command::PossibleTargets { .. } => "PossibleTargets",
            Command::Exit => "Exit",
            Command::BuyTank { .. } => "BuyTank",
            Command::Fire { .. } => "Fire",
            Command::FireAt { .. } => "FireAt",
            Command::Forward { .. } => "Forward",
            Command::Backward { .. } => "Backward",
            Command::Stop { .. } => "Stop",
            Command::Left { .. } => "Left",
            Command::Right { .. } => "Right",
            Command::SetMacroMoveTo { .. } => "SetMacroMoveTo",
            Command::SetMacro { .. } => "SetMacro",
        }
    }

    /// 命令作用的单位（若有）
    pub fn target(&self) -> Option<&TankId> {
        match self {
            Command::TankStatus { id }
            | Command::CloseTargets { id, .. }
            | Command::PossibleTargets { id, .. }
            | Command::Fire { id, .. }
            | Command::FireAt { id, .. }
            | Command::Forward { id }
            | Command::Backward { id }
            | Command::Stop { id }
            | Command::Left { id }
            | Command::Right { id }
            | Command::SetMacroMoveTo { id, .. }
            | Command::SetMacro { id, .. } => Some(id),
            Command::MyName | Command::GameStatus | Command::Exit | Command::BuyTank { .. } => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = self.verb();
        match self {
            Command::MyName | Command::GameStatus | Command::Exit => f.write_str(verb),
            Command::TankStatus { id }
            | Command::Forward { id }
            | Command::Backward { id }
            | Command::Stop { id }
            | Command::Left { id }
            | Command::Right { id } => write!(f, "{} {}", verb, id),
            Command::CloseTargets { id, filters } | Command::PossibleTargets { id, filters } => {
                write!(f, "{} {} {}", verb, id, filters)
            }
            Command::BuyTank {
                armor,
                damage,
                weapon,
            } => write!(f, "{} {} {} {}", verb, armor, damage, weapon),
            Command::Fire {
                id,
                angle,
                distance,
            } => write!(f, "{} {} {} {}", verb, id, angle, distance),
            Command::FireAt { id, x, y } | Command::SetMacroMoveTo { id, x, y } => {
                write!(f, "{} {} {} {}", verb, id, x, y)
            }
            Command::SetMacro { id, name } => write!(f, "{} {} {}", verb, id, name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TankId {
        TankId::new(s)
    }

    #[test]
    fn test_render_vocabulary() {
        let cases = [
            (Command::MyName, "MyName"),
            (Command::GameStatus, "GameStatus"),
            (Command::TankStatus { id: id("3") }, "TankStatus 3"),
            (
                Command::BuyTank {
                    armor: 5,
                    damage: 70,
                    weapon: WeaponKind::Artillery,
                },
                "BuyTank 5 70 Artillery",
            ),
            (
                Command::Fire {
                    id: id("3"),
                    angle: 90,
                    distance: 250,
                },
                "Fire 3 90 250",
            ),
            (Command::FireAt { id: id("3"), x: -4, y: 17 }, "FireAt 3 -4 17"),
            (Command::Stop { id: id("3") }, "Stop 3"),
            (
                Command::SetMacroMoveTo { id: id("3"), x: 450, y: 400 },
                "SetMacroMoveTo 3 450 400",
            ),
            (
                Command::SetMacro {
                    id: id("-1"),
                    name: MacroName::GuardMode,
                },
                "SetMacro -1 GuardMode",
            ),
        ];
        for (cmd, expected) in cases {
            assert_eq!(cmd.to_string(), expected);
        }
    }

    #[test]
    fn test_target_filters_pad_empty_slots() {
        let cmd = Command::CloseTargets {
            id: id("2"),
            filters: TargetFilters::new(["red", "red_base"]),
        };
        assert_eq!(cmd.to_string(), "CloseTargets 2 red red_base   ");

        let own = TargetFilters::excluding_own(&Side::Blue);
        assert_eq!(own.to_string(), "blue blue_base neutral_rock red_rock blue_rock");
    }

    #[test]
    fn test_command_target() {
        assert_eq!(Command::Left { id: id("4") }.target(), Some(&id("4")));
        assert_eq!(Command::GameStatus.target(), None);
    }
}
