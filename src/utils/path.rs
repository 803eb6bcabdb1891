//! # 静态文件路径工具函数
//!
//! 提供静态文件服务相关的路径处理：
//! - 将请求 URL 归一化为静态根目录下的相对路径（去除查询串、`..` 组件）
//! - 判断路径是否命中受保护的文件名（凭证文件、统计文件）
//! - 按扩展名推断 Content-Type

use std::path::{Component, Path, PathBuf};

/// 将请求路径归一化为相对路径
///
/// 处理规则：
/// 1. 去除 `?` 之后的查询串
/// 2. 根路径 `/` 映射为 `index.html`
/// 3. 丢弃 `..`、`.` 和根组件，防止目录穿越
///
/// # 示例
/// ```
/// use daxue_reader::utils::path::normalize_request_path;
/// assert_eq!(normalize_request_path("/css/a.css?v=2"), std::path::PathBuf::from("css/a.css"));
/// ```
pub fn normalize_request_path(url: &str) -> PathBuf {
    let path = url.split('?').next().unwrap_or("");
    let path = if path.is_empty() || path == "/" {
        "/index.html"
    } else {
        path
    };

    Path::new(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// 路径中是否包含任一受保护的文件名
///
/// 采用子串匹配：`/backup/.env.old` 同样被拒绝。
pub fn is_protected(request_path: &str, protected_names: &[String]) -> bool {
    protected_names
        .iter()
        .filter(|name| !name.is_empty())
        .any(|name| request_path.contains(name.as_str()))
}

/// 按扩展名推断 Content-Type，未知扩展名返回 `application/octet-stream`
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_root_and_query() {
        assert_eq!(normalize_request_path("/"), PathBuf::from("index.html"));
        assert_eq!(normalize_request_path("/?from=share"), PathBuf::from("index.html"));
        assert_eq!(normalize_request_path("/js/app.js?v=3"), PathBuf::from("js/app.js"));
    }

    #[test]
    fn test_normalize_strips_traversal() {
        assert_eq!(
            normalize_request_path("/../../etc/passwd"),
            PathBuf::from("etc/passwd")
        );
        assert_eq!(
            normalize_request_path("/css/../../secret.txt"),
            PathBuf::from("css/secret.txt")
        );
    }

    #[test]
    fn test_is_protected() {
        let names = vec![".env".to_string(), "analytics.json".to_string()];
        assert!(is_protected("/.env", &names));
        assert!(is_protected("/backup/.env.old", &names));
        assert!(is_protected("/analytics.json", &names));
        assert!(!is_protected("/data.json", &names));
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(mime_type(Path::new("LOGO.PNG")), "image/png");
        assert_eq!(mime_type(Path::new("font.woff2")), "application/octet-stream");
    }
}
