//! 传输层：行协议客户端抽象与实现（TCP / Scripted）

pub mod mock;
pub mod tcp;
pub mod traits;

pub use mock::ScriptedTransport;
pub use tcp::TcpClient;
pub use traits::{normalize_command, strip_line_end, CommandTransport};
