//! # AI 解读代理接口
//!
//! `POST /api/interpret`：读取请求体后交给 `InterpretProxy` 转发，
//! 回复统一带上 `Access-Control-Allow-Origin: *`。

use http::header::{self, HeaderValue};
use http::StatusCode;
use hyper::body::Body;

use super::{HttpResponse, json_error, read_body, respond};
use crate::services::proxy::InterpretProxy;

/// 转发一次解读请求
pub async fn handle<B>(proxy: &InterpretProxy, body: B) -> HttpResponse
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let bytes = match read_body(body).await {
        Ok(bytes) => bytes,
        Err(e) => return json_error(StatusCode::INTERNAL_SERVER_ERROR, e),
    };

    let reply = proxy.forward(&bytes).await;
    let mut response = respond(reply.status, "application/json", reply.body);
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::AppConfig;
    use crate::services::generation::MockGenerationClient;
    use bytes::Bytes;
    use http_body_util::{BodyExt, Full};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_relay_with_cors_header() {
        let client = Arc::new(MockGenerationClient::replying_json(json!({"candidates": []})));
        let config = AppConfig {
            api_key: Some("secret".to_string()),
            ..AppConfig::default()
        };
        let proxy = InterpretProxy::new(&config, client);

        let response = handle(&proxy, Full::new(Bytes::from_static(b"{}"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"{"candidates":[]}"#);
    }
}
