//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `TANKWARS__*` 覆盖（双下划线表示嵌套，如 `TANKWARS__SERVER__PORT=4444`）。

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::world::WeaponKind;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub strategy: StrategySection,
}

/// [server] 段：游戏服务器地址与连接超时
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 建立连接并读取欢迎行的总超时（秒）
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3333
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ServerSection {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// 角色槽位为哨兵 ID 时，后续命令如何处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingUnitPolicy {
    /// 照常发送，由服务器决定如何解释哨兵 ID
    #[default]
    Send,
    /// 不发送，仅记录警告
    Skip,
    /// 终止当前阶段
    Abort,
}

/// [strategy] 段：脚本化策略的阈值与轮询间隔
#[derive(Debug, Clone, Deserialize)]
pub struct StrategySection {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_stage_iteration")]
    pub stage_iteration: u64,
    #[serde(default = "default_stage_offset")]
    pub stage_offset: i64,
    #[serde(default = "default_cash_threshold")]
    pub cash_threshold: i64,
    #[serde(default)]
    pub missing_unit: MissingUnitPolicy,
    /// Attack 阶段是否让初始的 cannon / rocket 单位也切到 AttackMove
    #[serde(default)]
    pub attack_with_all: bool,
    /// Attack 之后额外的增援轮数（每轮等待现金、购买、为空闲单位安装 AttackMove）
    #[serde(default)]
    pub reinforcements: u32,
    #[serde(default)]
    pub purchase: PurchaseSection,
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_stage_iteration() -> u64 {
    800
}

fn default_stage_offset() -> i64 {
    150
}

fn default_cash_threshold() -> i64 {
    100
}

impl Default for StrategySection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            stage_iteration: default_stage_iteration(),
            stage_offset: default_stage_offset(),
            cash_threshold: default_cash_threshold(),
            missing_unit: MissingUnitPolicy::default(),
            attack_with_all: false,
            reinforcements: 0,
            purchase: PurchaseSection::default(),
        }
    }
}

impl StrategySection {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// [strategy.purchase] 段：BuyTank 参数
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseSection {
    #[serde(default = "default_armor")]
    pub armor: i32,
    #[serde(default = "default_damage")]
    pub damage: i32,
    #[serde(default = "default_weapon")]
    pub weapon: WeaponKind,
}

fn default_armor() -> i32 {
    5
}

fn default_damage() -> i32 {
    70
}

fn default_weapon() -> WeaponKind {
    WeaponKind::Artillery
}

impl Default for PurchaseSection {
    fn default() -> Self {
        Self {
            armor: default_armor(),
            damage: default_damage(),
            weapon: default_weapon(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 TANKWARS__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 TANKWARS__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("TANKWARS")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // load_config 总会读取 TANKWARS__* 环境变量，读写环境的测试必须串行
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_match_scripted_constants() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 3333);
        assert_eq!(cfg.strategy.stage_iteration, 800);
        assert_eq!(cfg.strategy.cash_threshold, 100);
        assert_eq!(cfg.strategy.poll_interval(), Duration::from_secs(5));
        assert_eq!(cfg.strategy.missing_unit, MissingUnitPolicy::Send);
        assert_eq!(cfg.strategy.purchase.weapon, WeaponKind::Artillery);
    }

    #[test]
    fn test_file_overrides_partial_sections() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 4444\n\n[strategy]\npoll_interval_ms = 10\nmissing_unit = \"skip\"\n\n[strategy.purchase]\nweapon = \"RocketLauncher\""
        )
        .unwrap();

        let cfg = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.server.port, 4444);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.strategy.poll_interval_ms, 10);
        assert_eq!(cfg.strategy.missing_unit, MissingUnitPolicy::Skip);
        assert_eq!(cfg.strategy.purchase.weapon, WeaponKind::RocketLauncher);
        assert_eq!(cfg.strategy.purchase.armor, 5);
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("TANKWARS__STRATEGY__MISSING_UNIT", "abort");
        std::env::set_var("TANKWARS__STRATEGY__PURCHASE__ARMOR", "9");

        let cfg = load_config(None);

        std::env::remove_var("TANKWARS__STRATEGY__MISSING_UNIT");
        std::env::remove_var("TANKWARS__STRATEGY__PURCHASE__ARMOR");

        let cfg = cfg.unwrap();
        assert_eq!(cfg.strategy.missing_unit, MissingUnitPolicy::Abort);
        assert_eq!(cfg.strategy.purchase.armor, 9);
        assert_eq!(cfg.strategy.purchase.damage, 70);
        assert_eq!(cfg.server.port, 3333);
    }
}
