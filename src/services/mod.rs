//! # 业务逻辑服务模块
//!
//! 包含核心业务逻辑的实现，与 HTTP 处理层解耦：
//! - `content` - 经文数据加载、章节分组与原文清洗
//! - `parser` - AI 解读文本的四段式拆分
//! - `prompt` - 解读提示词与生成请求体构建
//! - `generation` - 生成 API 客户端（真实 HTTP 实现与测试用 Mock）
//! - `proxy` - AI 解读代理：附加服务端凭证后转发给上游
//! - `interpreter` - 段落解读流程：单飞控制、错误提取与重试
//! - `storage` - 统计文档的存储后端（JSON 文件 / 内存）
//! - `analytics` - 访问统计的记录与汇总
//! - `dashboard` - 数据分析面板 HTML 渲染

pub mod analytics;
pub mod content;
pub mod dashboard;
pub mod generation;
pub mod interpreter;
pub mod parser;
pub mod prompt;
pub mod proxy;
pub mod storage;
