//! 核心层：错误分类与进程级关闭

pub mod error;
pub mod shutdown;

pub use error::{ClientError, StrategyError, TransportError};
pub use shutdown::{run_with_graceful_shutdown, ShutdownManager, ShutdownReason};
