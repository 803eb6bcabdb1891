//! # 数据模型模块
//!
//! 定义了与前端 JSON 结构一一对应的 Rust 数据结构。
//! - `passage` - 原文段落与章节
//! - `interpretation` - 四段式 AI 解读结果
//! - `analytics` - 访问统计文档与汇总结构
//! - `identity` - 匿名客户端标识
//! - `settings` - 进程级应用配置

pub mod analytics;
pub mod identity;
pub mod interpretation;
pub mod passage;
pub mod settings;
