//! # AI 解读代理服务
//!
//! 接收前端已经按生成 API 格式组织好的请求体，附加服务端持有的凭证与模型名后转发给上游，
//! 再把上游的状态码与响应体原样返回。凭证从不离开服务端。
//!
//! ## 失败语义
//! | 情形 | 状态码 | 响应体 |
//! |------|--------|--------|
//! | 未配置凭证 | 500 | `{"error":"API key not configured"}`，不发起任何上游请求 |
//! | 请求体不是合法 JSON | 500 | `{"error": <解析错误>}` |
//! | 上游连接失败 | 500 | `{"error": <错误信息>}` |
//! | 上游返回非 JSON | 上游状态码 | `{"error": "上游响应格式异常"}` |
//! | 其他 | 上游状态码 | 上游响应体原样 |

use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use serde_json::{Value, json};

use crate::models::settings::AppConfig;
use crate::services::generation::GenerationClient;

/// 未配置凭证时的错误信息
pub const MISSING_KEY_MESSAGE: &str = "API key not configured";

/// 代理的回复
#[derive(Debug, Clone)]
pub struct ProxyReply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ProxyReply {
    fn error(status: StatusCode, message: impl std::fmt::Display) -> Self {
        Self {
            status,
            body: Bytes::from(json!({ "error": message.to_string() }).to_string()),
        }
    }
}

/// 解读代理
pub struct InterpretProxy {
    api_key: Option<String>,
    model: String,
    client: Arc<dyn GenerationClient>,
}

impl InterpretProxy {
    /// 从启动配置中取出凭证与模型名，此后不再变化
    pub fn new(config: &AppConfig, client: Arc<dyn GenerationClient>) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// 转发一次生成请求
    ///
    /// # 参数
    /// - `body` - 前端发来的原始请求体
    ///
    /// # 返回值
    /// 始终返回一个可直接写回客户端的回复，错误已转换为 JSON 错误体
    pub async fn forward(&self, body: &[u8]) -> ProxyReply {
        let Some(api_key) = self.api_key.as_deref() else {
            log::warn!("收到解读请求，但未配置 API key");
            return ProxyReply::error(StatusCode::INTERNAL_SERVER_ERROR, MISSING_KEY_MESSAGE);
        };

        let request: Value = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("解读请求体解析失败: {}", e);
                return ProxyReply::error(StatusCode::INTERNAL_SERVER_ERROR, e);
            }
        };

        let upstream = match self.client.generate(&self.model, api_key, &request).await {
            Ok(upstream) => upstream,
            Err(e) => {
                log::error!("API proxy error: {}", e);
                return ProxyReply::error(StatusCode::INTERNAL_SERVER_ERROR, e);
            }
        };

        if upstream.json().is_none() {
            log::error!("上游返回了非 JSON 响应（状态 {}）", upstream.status);
            return ProxyReply::error(upstream.status, "上游响应格式异常");
        }

        if !upstream.status.is_success() {
            log::warn!("上游返回错误状态 {}", upstream.status);
        }

        ProxyReply {
            status: upstream.status,
            body: upstream.body,
        }
    }
}
