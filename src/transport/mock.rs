//! Scripted 传输（用于测试，无需服务器）
//!
//! 每条命令交给一个闭包生成回复，同时按顺序记录所有已发送的命令，便于断言决策循环的行为。

use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::ClientError;
use crate::transport::{normalize_command, CommandTransport};

type Responder = Box<dyn Fn(&str) -> Result<String, ClientError> + Send + Sync>;

/// 由闭包驱动的内存传输
pub struct ScriptedTransport {
    responder: Responder,
    sent: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, ClientError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// 所有已发送的命令（已规范化）
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// 以 `verb` 开头的命令数
    pub fn count(&self, verb: &str) -> usize {
        self.sent()
            .iter()
            .filter(|c| c.split(' ').next() == Some(verb))
            .count()
    }
}

#[async_trait]
impl CommandTransport for ScriptedTransport {
    async fn command(&self, raw: &str) -> Result<String, ClientError> {
        let line = normalize_command(raw);
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(line.clone());
        }
        (self.responder)(&line)
    }
}
