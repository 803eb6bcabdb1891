//! # HTTP 请求处理模块
//!
//! 本模块包含所有路由对应的处理函数，每个子模块对应一个功能域：
//! - `analytics` - 访问统计的上报、汇总与数据面板
//! - `interpret` - AI 解读代理接口
//! - `static_files` - 静态文件服务
//!
//! 处理函数统一返回 `Response<Full<Bytes>>`，错误在此层转换为状态码和响应体，
//! 不会向上传播到连接层。

pub mod analytics;
pub mod interpret;
pub mod static_files;

use bytes::Bytes;
use http::header::{self, HeaderValue};
use http::{Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use serde::Serialize;

/// 所有处理函数的响应类型
pub type HttpResponse = Response<Full<Bytes>>;

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain";

/// 以给定状态码和 Content-Type 构建响应
pub(crate) fn respond(
    status: StatusCode,
    content_type: &str,
    body: impl Into<Bytes>,
) -> HttpResponse {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    if let Ok(value) = HeaderValue::from_str(content_type) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

/// 纯文本响应（如 `Not Found`、`Forbidden`）
pub(crate) fn text(status: StatusCode, body: &'static str) -> HttpResponse {
    respond(status, TEXT_CONTENT_TYPE, body)
}

/// 紧凑 JSON 响应
pub(crate) fn json<T: Serialize>(status: StatusCode, value: &T) -> HttpResponse {
    match serde_json::to_vec(value) {
        Ok(body) => respond(status, JSON_CONTENT_TYPE, body),
        Err(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// 缩进 JSON 响应（汇总接口使用，便于直接阅读）
pub(crate) fn pretty_json<T: Serialize>(status: StatusCode, value: &T) -> HttpResponse {
    match serde_json::to_vec_pretty(value) {
        Ok(body) => respond(status, JSON_CONTENT_TYPE, body),
        Err(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// `{"error": "<message>"}` 形式的错误响应
pub(crate) fn json_error(status: StatusCode, message: impl std::fmt::Display) -> HttpResponse {
    let body = serde_json::json!({ "error": message.to_string() }).to_string();
    respond(status, JSON_CONTENT_TYPE, body)
}

/// 读取完整的请求体
///
/// # 错误
/// 连接中断等读取失败时返回错误信息
pub(crate) async fn read_body<B>(body: B) -> Result<Bytes, String>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    body.collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| format!("读取请求体失败: {}", e))
}

/// CORS 预检请求的响应
pub fn preflight() -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::new()));
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
