//! 回复分类
//!
//! 服务器的设置类命令回复 `ok` / `ok <附加信息>` / `err: <原因>`；
//! 查询类命令直接回复 JSON 或名字。传输层不关心这些，分类只在调用方需要时进行。

/// 一行回复的语义
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `ok`，可带附加信息（如 BuyTank 的 `ok 12`、SetMacro 的 `ok: disable macro`）
    Ok(Option<String>),
    /// `err: ...`，服务器拒绝了请求
    Err(String),
    /// 其余内容：JSON、阵营名等
    Payload(String),
}

impl Reply {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed == "ok" {
            return Reply::Ok(None);
        }
        if let Some(rest) = trimmed.strip_prefix("ok ").or_else(|| trimmed.strip_prefix("ok:")) {
            return Reply::Ok(Some(rest.trim().to_string()));
        }
        if let Some(rest) = trimmed.strip_prefix("err:") {
            return Reply::Err(rest.trim().to_string());
        }
        Reply::Payload(line.to_string())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Reply::Err(_))
    }
}
