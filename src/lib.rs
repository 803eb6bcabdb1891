//! # 阿莲读经典 - 服务端核心
//!
//! 《大学》阅读应用的后端，包括：
//! - 静态前端资源服务
//! - AI 解读代理（凭证只保存在服务端）
//! - 轻量访问统计（单个 JSON 文件）与数据分析面板
//!
//! 以及不依赖页面的前端核心逻辑：经文加载与清洗、提示词构建、
//! 解读结果拆分、匿名客户端标识、单飞解读流程。
//!
//! ## 模块结构
//! - `commands/` - HTTP 路由处理函数
//! - `models/` - 数据模型（与前端 JSON 结构一一对应）
//! - `services/` - 核心业务逻辑
//! - `server` - 全局状态、路由分发与连接处理
//! - `utils/` - 通用工具函数

pub mod commands;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

use models::settings::AppConfig;
use server::AppState;

/// 补全配置中的凭证与模型名
///
/// 读取 `config.env_file`，文件中缺少的键再查询进程环境变量。
/// 文件无法读取时记录错误并按空文件处理。
pub fn load_config(config: AppConfig) -> AppConfig {
    let file_vars = match utils::env_file::load_env_file(&config.env_file) {
        Ok(vars) => vars,
        Err(e) => {
            log::error!("{}", e);
            Default::default()
        }
    };
    config.apply_env(&file_vars, |key| std::env::var(key).ok())
}

/// 启动 HTTP 服务
///
/// 以 JSON 文件存储统计数据、以真实的生成 API 作为上游，阻塞直到进程退出。
///
/// # 错误
/// 端口绑定失败时返回错误
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    server::run(AppState::from_config(config)).await
}
