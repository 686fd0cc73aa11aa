//! 工具函数模块
//!
//! 提供各类通用工具函数，包括：
//! - 数据目录和日志目录
//! - 系统代理配置

pub mod file_system;
pub mod proxy;

// 重新导出常用函数
pub use file_system::*;
pub use proxy::*;
