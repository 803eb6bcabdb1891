//! # 应用配置数据模型
//!
//! 定义了进程启动时一次性构建的 `AppConfig`。
//!
//! 配置来源：
//! - 命令行参数（端口、静态根目录、各文件路径）
//! - `.env` 键值文件（`GEMINI_API_KEY`、`GEMINI_MODEL`），文件中缺失的键回退到进程环境变量
//!
//! 构建完成后以 `Arc<AppConfig>` 形式传给需要它的组件，运行期间不再重新读取。

use std::collections::HashMap;
use std::path::PathBuf;

/// 凭证在 `.env` 中的键名
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// 模型名在 `.env` 中的键名
pub const MODEL_VAR: &str = "GEMINI_MODEL";

/// 未配置模型名时使用的默认模型
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// 生成 API 的默认地址
pub const DEFAULT_UPSTREAM_BASE: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_PORT: u16 = 8080;

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 生成 API 凭证；为 None 时解读接口直接返回 500
    pub api_key: Option<String>,

    /// 生成模型名
    pub model: String,

    /// 上游生成 API 的基础地址（测试时可指向本地）
    pub upstream_base: String,

    /// 监听端口
    pub port: u16,

    /// 静态文件根目录
    pub static_root: PathBuf,

    /// `.env` 凭证文件路径（该文件名禁止通过静态服务访问）
    pub env_file: PathBuf,

    /// 统计文档路径（该文件名禁止通过静态服务访问）
    pub analytics_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            upstream_base: DEFAULT_UPSTREAM_BASE.to_string(),
            port: DEFAULT_PORT,
            static_root: PathBuf::from("."),
            env_file: PathBuf::from(".env"),
            analytics_file: PathBuf::from("analytics.json"),
        }
    }
}

impl AppConfig {
    /// 从 `.env` 键值对填充凭证与模型名
    ///
    /// `lookup_env` 用于在文件缺少某个键时查询进程环境变量，
    /// 空字符串视为未配置。
    pub fn apply_env(
        mut self,
        file_vars: &HashMap<String, String>,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let resolve = |key: &str| {
            file_vars
                .get(key)
                .cloned()
                .or_else(|| lookup_env(key))
                .filter(|v| !v.trim().is_empty())
        };

        self.api_key = resolve(API_KEY_VAR);
        if let Some(model) = resolve(MODEL_VAR) {
            self.model = model;
        }
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// 受保护的文件名列表，静态服务遇到包含这些名字的路径返回 403
    pub fn protected_names(&self) -> Vec<String> {
        [&self.env_file, &self.analytics_file]
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_env_file_wins_over_process_env() {
        let mut vars = HashMap::new();
        vars.insert(API_KEY_VAR.to_string(), "file-key".to_string());
        let config = AppConfig::default().apply_env(&vars, |_| Some("env-value".into()));
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
        // 文件中缺少模型名时回退到环境变量
        assert_eq!(config.model, "env-value");
    }

    #[test]
    fn test_apply_env_defaults() {
        let config = AppConfig::default().apply_env(&HashMap::new(), |_| None);
        assert!(!config.has_api_key());
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_blank_key_is_unconfigured() {
        let mut vars = HashMap::new();
        vars.insert(API_KEY_VAR.to_string(), "  ".to_string());
        let config = AppConfig::default().apply_env(&vars, |_| None);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_protected_names() {
        let config = AppConfig {
            env_file: PathBuf::from("/srv/app/.env"),
            analytics_file: PathBuf::from("data/analytics.json"),
            ..AppConfig::default()
        };
        assert_eq!(config.protected_names(), vec![".env", "analytics.json"]);
    }
}
