//! # 段落解读流程
//!
//! 描述用户选中一个段落后的完整解读流程（与界面无关的部分）：
//! 1. 单飞控制：同一时刻最多一个解读请求在途，忙碌时再次选择静默忽略
//! 2. 清洗原文 → 构建提示词与请求体 → 经解读代理发往上游
//! 3. 非 2xx：取上游的 `error.message` 作为错误信息（缺省为 "API请求失败"）
//! 4. 取出 `candidates[0].content.parts[0].text`，缺失则报 "AI响应格式异常"
//! 5. 拆分为四段式结果
//!
//! 失败后可通过 `retry()` 对最近一次选中的段落重新发起同样的请求。

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use http::StatusCode;
use serde_json::Value;

use crate::models::interpretation::InterpretationResult;
use crate::models::passage::PassageRecord;
use crate::services::content::clean_content;
use crate::services::parser::parse_interpretation;
use crate::services::prompt;
use crate::services::proxy::InterpretProxy;

/// 解读失败的原因，`Display` 即为展示给用户的错误文案
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("AI响应格式异常")]
    MalformedResponse,

    #[error("尚未选择段落")]
    NothingSelected,
}

/// 一次成功的解读
#[derive(Debug, Clone)]
pub struct Interpretation {
    /// 清洗后的原文
    pub original_text: String,
    pub result: InterpretationResult,
}

/// 段落解读器
pub struct Interpreter {
    proxy: Arc<InterpretProxy>,
    busy: AtomicBool,
    current: Mutex<Option<PassageRecord>>,
}

/// 在作用域结束时释放忙碌标记
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Interpreter {
    pub fn new(proxy: Arc<InterpretProxy>) -> Self {
        Self {
            proxy,
            busy: AtomicBool::new(false),
            current: Mutex::new(None),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// 解读选中的段落
    ///
    /// # 返回值
    /// - `Ok(Some(..))` - 解读成功
    /// - `Ok(None)` - 已有请求在途，本次调用被忽略
    ///
    /// # 错误
    /// 上游返回错误状态或响应格式异常
    pub async fn interpret(
        &self,
        paragraph: &PassageRecord,
    ) -> Result<Option<Interpretation>, InterpretError> {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(paragraph.clone());
        }
        self.run(paragraph).await
    }

    /// 对最近一次选中的段落重新发起解读
    pub async fn retry(&self) -> Result<Option<Interpretation>, InterpretError> {
        let paragraph = self
            .current
            .lock()
            .ok()
            .and_then(|current| current.clone())
            .ok_or(InterpretError::NothingSelected)?;
        self.run(&paragraph).await
    }

    async fn run(&self, paragraph: &PassageRecord) -> Result<Option<Interpretation>, InterpretError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!("已有解读请求在途，忽略段落 {}", paragraph.id);
            return Ok(None);
        }
        let _guard = BusyGuard(&self.busy);

        let text = clean_content(&paragraph.content);
        let request = prompt::build_request(&text);
        let reply = self.proxy.forward(request.to_string().as_bytes()).await;
        let body: Option<Value> = serde_json::from_slice(&reply.body).ok();

        if !reply.status.is_success() {
            let message = body
                .as_ref()
                .and_then(prompt::extract_error_message)
                .unwrap_or("API请求失败")
                .to_string();
            return Err(InterpretError::Upstream {
                status: reply.status,
                message,
            });
        }

        let ai_text = body
            .as_ref()
            .and_then(prompt::extract_text)
            .filter(|t| !t.is_empty())
            .ok_or(InterpretError::MalformedResponse)?;

        Ok(Some(Interpretation {
            original_text: text,
            result: parse_interpretation(ai_text),
        }))
    }
}
