//! # 通用工具函数模块
//!
//! - `env_file` - `.env` 键值文件解析
//! - `path` - 静态文件请求路径归一化、受保护文件判断与 MIME 推断

pub mod env_file;
pub mod path;
