//! 客户端错误类型
//!
//! 三层分类：建立连接失败（Connection）、已建立连接上的读写失败（Transport）、
//! 回复无法按预期解析（Protocol）。传输层不重试，错误一律上抛给决策循环。

use std::io;

use thiserror::Error;

use crate::strategy::Phase;

/// 已建立连接上的 I/O 失败；对该连接是致命的
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 连接已关闭（此前的 I/O 失败或显式 close）
    #[error("connection closed")]
    Closed,

    /// 对端在完整的一行到达之前关闭了连接
    #[error("unexpected end of stream")]
    UnexpectedEof,
}

/// 客户端对外暴露的错误
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("cannot connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol error in reply to {command}: {message}")]
    Protocol { command: String, message: String },
}

impl ClientError {
    pub fn protocol(command: impl Into<String>, message: impl ToString) -> Self {
        Self::Protocol {
            command: command.into(),
            message: message.to_string(),
        }
    }
}

/// 决策循环错误：记录失败发生在哪个阶段
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("phase {phase} failed: {source}")]
    Client {
        phase: Phase,
        #[source]
        source: ClientError,
    },

    /// missing_unit = abort 时，角色槽位仍为哨兵 ID
    #[error("phase {phase}: no unit fills role '{role}'")]
    MissingUnit { phase: Phase, role: String },
}

impl StrategyError {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Client { phase, .. } | Self::MissingUnit { phase, .. } => *phase,
        }
    }
}
