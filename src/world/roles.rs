//! 角色槽位：按武器类型把己方单位归类到 cannon / rocket / artillery 等槽位
//!
//! 线性扫描；同一角色出现多个单位时取数组中最后一个。找不到时槽位为哨兵 ID。

use std::collections::HashSet;

use super::{TankId, WeaponKind, WorldSnapshot};

/// 在快照中查找 `owner` 拥有的、武器类型为 `kind` 的单位
pub fn find_unit(snapshot: &WorldSnapshot, owner: &str, kind: WeaponKind) -> TankId {
    snapshot
        .owned_by(owner)
        .filter(|t| t.weapon.typ == kind.as_str())
        .last()
        .map(|t| t.id.clone())
        .unwrap_or_default()
}

/// 购买后重新发现新单位：`after` 中属于 `owner`、类型为 `kind`、且 `before` 中不存在的单位
///
/// BuyTank 的回复不作为 ID 来源，只能通过前后两次快照的差集找回。
pub fn discover_new(
    before: &WorldSnapshot,
    after: &WorldSnapshot,
    owner: &str,
    kind: WeaponKind,
) -> TankId {
    let known: HashSet<&TankId> = before.tanks.iter().map(|t| &t.id).collect();
    after
        .owned_by(owner)
        .filter(|t| t.weapon.typ == kind.as_str() && !known.contains(&t.id))
        .last()
        .map(|t| t.id.clone())
        .unwrap_or_default()
}

/// 初始两个角色的槽位
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleSlots {
    pub cannon: TankId,
    pub rocket: TankId,
}

impl RoleSlots {
    pub fn classify(snapshot: &WorldSnapshot, owner: &str) -> Self {
        Self {
            cannon: find_unit(snapshot, owner, WeaponKind::Cannon),
            rocket: find_unit(snapshot, owner, WeaponKind::RocketLauncher),
        }
    }

    /// (角色名, ID) 列表，按固定顺序
    pub fn entries(&self) -> [(&'static str, &TankId); 2] {
        [
            (WeaponKind::Cannon.role(), &self.cannon),
            (WeaponKind::RocketLauncher.role(), &self.rocket),
        ]
    }
}
