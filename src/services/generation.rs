//! # 生成 API 客户端
//!
//! 抽象"把一个生成请求发给上游模型"这一动作，解读代理和命令行解读都通过它访问上游。
//! 两种实现：
//! - `HttpGenerationClient`：通过 reqwest 调用真实的生成 API（生产）
//! - `MockGenerationClient`：返回预设响应并记录调用次数（仅测试构建）
//!
//! 客户端不重试、不设超时、不改写请求体；上游的状态码和响应体原样返回给调用方。

#[cfg(test)]
use std::sync::Mutex;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use serde_json::Value;

/// 上游的原始响应
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 以 JSON 解析响应体
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// 生成请求的传输层错误
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("上游请求失败: {0}")]
    Transport(String),

    #[error("上游响应读取失败: {0}")]
    Body(String),
}

/// 生成 API 客户端
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// 以给定模型和凭证发送生成请求
    async fn generate(
        &self,
        model: &str,
        api_key: &str,
        request: &Value,
    ) -> Result<UpstreamResponse, GenerationError>;
}

/// 基于 reqwest 的生成 API 客户端
pub struct HttpGenerationClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGenerationClient {
    /// # 参数
    /// - `base_url` - 上游地址（如 `https://generativelanguage.googleapis.com`）
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/v1beta/models/{model}:generateContent`
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(
        &self,
        model: &str,
        api_key: &str,
        request: &Value,
    ) -> Result<UpstreamResponse, GenerationError> {
        let response = self
            .http
            .post(self.endpoint(model))
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Body(e.to_string()))?;

        log::debug!("上游响应 {}，{} 字节", status, body.len());
        Ok(UpstreamResponse { status, body })
    }
}

/// 测试用的生成客户端：返回预设响应，并记录调用次数与最后一次请求
#[cfg(test)]
pub struct MockGenerationClient {
    reply: Result<UpstreamResponse, String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, Value)>>,
}

#[cfg(test)]
impl MockGenerationClient {
    /// 总是返回给定响应
    pub fn replying(reply: UpstreamResponse) -> Self {
        Self {
            reply: Ok(reply),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// 总是返回 200 和给定 JSON
    pub fn replying_json(body: Value) -> Self {
        Self::replying(UpstreamResponse::new(StatusCode::OK, body.to_string()))
    }

    /// 总是以传输错误失败
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 最后一次请求的 (模型名, 请求体)
    pub fn last_request(&self) -> Option<(String, Value)> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

#[cfg(test)]
#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(
        &self,
        model: &str,
        _api_key: &str,
        request: &Value,
    ) -> Result<UpstreamResponse, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some((model.to_string(), request.clone()));
        }
        self.reply
            .clone()
            .map_err(GenerationError::Transport)
    }
}
