//! # 访问统计接口
//!
//! 处理 `/api/analytics` 前缀下的所有请求：
//! - `POST /api/analytics/pageview` - 上报页面浏览
//! - `POST /api/analytics/ai` - 上报 AI 解读使用
//! - `GET /api/analytics/summary` - 汇总统计（缩进 JSON）
//! - `GET /api/analytics/dashboard` - 数据分析面板（HTML）
//!
//! 前缀下的其他路径或方法返回 404 `{"error":"Not found"}`。

use http::{Method, StatusCode};
use hyper::body::Body;
use serde::Deserialize;

use super::{HttpResponse, json, json_error, pretty_json, read_body, respond};
use crate::models::analytics::VisitKind;
use crate::models::identity::ClientIdentity;
use crate::services::analytics::{AnalyticsStore, now_millis};
use crate::services::dashboard::render_dashboard;

/// 上报请求体
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    /// 客户端标识，缺失时记为匿名用户
    #[serde(default)]
    pub user_id: Option<String>,

    /// 当前章节名
    #[serde(default)]
    pub chapter: Option<String>,
}

/// 分发统计接口请求
///
/// # 参数
/// - `store` - 统计存储
/// - `method` / `path` - 请求方法与去除查询串后的路径
/// - `body` - 请求体（仅 POST 读取）
pub async fn handle<B>(store: &AnalyticsStore, method: &Method, path: &str, body: B) -> HttpResponse
where
    B: Body,
    B::Error: std::fmt::Display,
{
    match (method, path) {
        (&Method::POST, "/api/analytics/pageview") => track(store, VisitKind::Page, body).await,
        (&Method::POST, "/api/analytics/ai") => track(store, VisitKind::Ai, body).await,
        (&Method::GET, "/api/analytics/summary") => {
            let summary = store.compute_summary(now_millis()).await;
            pretty_json(StatusCode::OK, &summary)
        }
        (&Method::GET, "/api/analytics/dashboard") => {
            let summary = store.compute_summary(now_millis()).await;
            respond(
                StatusCode::OK,
                "text/html; charset=utf-8",
                render_dashboard(&summary),
            )
        }
        _ => json_error(StatusCode::NOT_FOUND, "Not found"),
    }
}

/// 解析上报请求体并记录一次事件
async fn track<B>(store: &AnalyticsStore, kind: VisitKind, body: B) -> HttpResponse
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let bytes = match read_body(body).await {
        Ok(bytes) => bytes,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, e),
    };

    let request: TrackRequest = match serde_json::from_slice(&bytes) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("统计上报请求体解析失败: {}", e);
            return json_error(StatusCode::BAD_REQUEST, e);
        }
    };

    let identity = ClientIdentity::from(request.user_id);
    let ack = match kind {
        VisitKind::Page => store.record_page_view(&identity, request.chapter).await,
        VisitKind::Ai => store.record_ai_usage(&identity, request.chapter).await,
    };
    json(StatusCode::OK, &ack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryBackend;
    use bytes::Bytes;
    use http_body_util::{BodyExt, Full};
    use serde_json::Value;
    use std::sync::Arc;

    fn store() -> AnalyticsStore {
        AnalyticsStore::new(Arc::new(MemoryBackend::new()))
    }

    fn body(text: &str) -> Full<Bytes> {
        Full::new(Bytes::from(text.to_string()))
    }

    async fn into_json(response: HttpResponse) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_pageview_then_summary() {
        let store = store();
        let response = handle(
            &store,
            &Method::POST,
            "/api/analytics/pageview",
            body(r#"{"userId":"u_1","chapter":"经一章"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(into_json(response).await["success"], true);

        let summary = into_json(
            handle(&store, &Method::GET, "/api/analytics/summary", body("")).await,
        )
        .await;
        assert_eq!(summary["overview"]["totalUniqueUsers"], 1);
        assert_eq!(summary["overview"]["totalPageViews"], 1);
    }

    #[tokio::test]
    async fn test_missing_user_id_is_anonymous() {
        let store = store();
        handle(&store, &Method::POST, "/api/analytics/ai", body("{}")).await;

        let doc = store.snapshot().await;
        assert_eq!(doc.users["anonymous"].ai_usage, 1);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let store = store();
        let response = handle(
            &store,
            &Method::POST,
            "/api/analytics/pageview",
            body("{not json"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(into_json(response).await["error"].is_string());
        assert!(store.snapshot().await.users.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_analytics_route() {
        let response = handle(&store(), &Method::GET, "/api/analytics/other", body("")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(into_json(response).await["error"], "Not found");

        // 方法不匹配同样视为未知路由
        let response = handle(&store(), &Method::GET, "/api/analytics/pageview", body("")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dashboard_is_html() {
        let response = handle(&store(), &Method::GET, "/api/analytics/dashboard", body("")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[http::header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }
}
