//! TankWars - 远程 AI 客户端
//!
//! 模块划分：
//! - **api**: 命令词表的直通封装（MyName / GameStatus / BuyTank / SetMacro ...）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误分类与优雅关闭
//! - **observability**: tracing 初始化
//! - **protocol**: 命令渲染与回复分类
//! - **strategy**: 阶段状态机与脚本化策略
//! - **transport**: 行协议传输（TCP 客户端 / Scripted 测试传输）
//! - **world**: 世界快照、坦克标识与角色归类

pub mod api;
pub mod config;
pub mod core;
pub mod observability;
pub mod protocol;
pub mod strategy;
pub mod transport;
pub mod world;

pub use api::GameApi;
pub use strategy::{ScriptedStrategy, Strategy};
pub use transport::{CommandTransport, TcpClient};
