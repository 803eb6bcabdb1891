//! # `.env` 键值文件解析
//!
//! 格式：每行一个 `KEY=VALUE`，`#` 开头的行为注释，空行忽略。
//! 值中允许出现 `=`（只按第一个 `=` 切分），键和值两端空白会被去除。

use std::collections::HashMap;
use std::path::Path;

/// 解析 `.env` 文本内容
pub fn parse_env(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// 读取并解析 `.env` 文件
///
/// # 错误
/// 文件不存在或无法读取时返回错误信息，由调用方决定是否降级为空配置
pub fn load_env_file(path: &Path) -> Result<HashMap<String, String>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("读取配置文件 {} 失败: {}", path.display(), e))?;
    Ok(parse_env(&content))
}
