//! 世界模型：GameStatus / TankStatus / Targets 的 JSON 结构、基础标识与角色归类

pub mod roles;
pub mod snapshot;
pub mod types;

pub use roles::{discover_new, find_unit, RoleSlots};
pub use snapshot::{Position, TankRecord, Target, WeaponInfo, WorldSnapshot};
pub use types::{MacroName, Side, TankId, WeaponKind};
