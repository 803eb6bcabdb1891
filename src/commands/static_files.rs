//! # 静态文件服务
//!
//! 从静态根目录读取前端资源（`index.html`、脚本、样式、`data.json` 等）。
//!
//! ## 处理顺序
//! 1. 归一化请求路径（去查询串、`/` → `index.html`、丢弃 `..`）
//! 2. 命中凭证文件名或统计文件名 → 403 `Forbidden`
//! 3. 文件不存在 → 404 `Not Found`；其他读取错误 → 500 `Server Error`
//! 4. 按扩展名设置 Content-Type 返回文件内容

use std::io::ErrorKind;
use std::path::Path;

use http::StatusCode;

use super::{HttpResponse, respond, text};
use crate::utils::path::{is_protected, mime_type, normalize_request_path};

/// 返回静态文件
///
/// # 参数
/// - `root` - 静态根目录
/// - `uri_path` - 请求的原始路径（可能带查询串）
/// - `protected_names` - 禁止访问的文件名列表
pub async fn serve(root: &Path, uri_path: &str, protected_names: &[String]) -> HttpResponse {
    let relative = normalize_request_path(uri_path);

    if is_protected(&relative.to_string_lossy(), protected_names) {
        log::warn!("拒绝访问受保护文件: {}", uri_path);
        return text(StatusCode::FORBIDDEN, "Forbidden");
    }

    let full_path = root.join(&relative);
    match tokio::fs::read(&full_path).await {
        Ok(data) => respond(StatusCode::OK, mime_type(&full_path), data),
        Err(e) if e.kind() == ErrorKind::NotFound => text(StatusCode::NOT_FOUND, "Not Found"),
        Err(e) => {
            log::error!("读取静态文件失败 {}: {}", full_path.display(), e);
            text(StatusCode::INTERNAL_SERVER_ERROR, "Server Error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    fn protected() -> Vec<String> {
        vec![".env".to_string(), "analytics.json".to_string()]
    }

    async fn body_text(response: HttpResponse) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>大学</h1>").unwrap();

        let response = serve(dir.path(), "/?from=share", &protected()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(body_text(response).await, "<h1>大学</h1>");
    }

    #[tokio::test]
    async fn test_protected_files_are_forbidden() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".env"), "GEMINI_API_KEY=secret").unwrap();
        std::fs::write(dir.path().join("analytics.json"), "{}").unwrap();

        for path in ["/.env", "/analytics.json", "/backup/.env.old"] {
            let response = serve(dir.path(), path, &protected()).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            assert_eq!(body_text(response).await, "Forbidden");
        }
    }

    #[tokio::test]
    async fn test_traversal_stays_in_root() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.js"), "1").unwrap();

        let response = serve(dir.path(), "/../../app.js", &protected()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "application/javascript; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_unreadable_path_is_server_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        // 目录无法按文件读取
        let response = serve(dir.path(), "/sub", &protected()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Server Error");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let response = serve(dir.path(), "/nope.css", &protected()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Not Found");
    }
}
