//! 行协议传输抽象
//!
//! 所有实现（TCP / Scripted）实现 CommandTransport：发送一行请求，返回与之配对的一行回复。

use async_trait::async_trait;

use crate::core::ClientError;

/// 请求/回复传输 trait：一次调用对应恰好一个请求行与一个回复行
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// 发送 `raw`（去除内嵌换行后追加 `\n`），阻塞直到读到一整行回复
    async fn command(&self, raw: &str) -> Result<String, ClientError>;
}

/// 删除所有内嵌的 `\r` / `\n`，防止一条命令被服务器拆成多行
pub fn normalize_command(raw: &str) -> String {
    raw.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

/// 去掉行尾的 `\r` / `\n`，其余空白保持原样
pub fn strip_line_end(line: &str) -> &str {
    line.trim_end_matches(|c| c == '\r' || c == '\n')
}
