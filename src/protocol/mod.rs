//! 协议层：命令词表与回复分类

pub mod command;
pub mod reply;

pub use command::{Command, TargetFilters};
pub use reply::Reply;
