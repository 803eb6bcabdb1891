//! # 解读提示词与请求构建
//!
//! 生成发给模型的固定格式提示词（四段式结构），并包装为生成 API 的请求体：
//! ```json
//! {
//!   "contents": [{ "parts": [{ "text": "<提示词>" }] }],
//!   "generationConfig": { "temperature": 0.7, "maxOutputTokens": 2048 }
//! }
//! ```

use serde_json::{Value, json};

const TEMPERATURE: f64 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 2048;

/// 为一段（已清洗的）原文构建提示词
pub fn build_prompt(text: &str) -> String {
    format!(
        "你是一位精通中国传统文化和家庭教育的智慧导师。请根据以下《大学》原文，为家长提供学习指导。

原文：
{text}

请严格按以下格式提供解读，每个部分都必须简洁精炼：

## 一、白话文解释
纯粹的现代汉语翻译，只翻译原文含义，不要任何解读、引申或额外信息。一段话即可。

## 二、家庭教育智慧
只写一段话。直接阐述这段经典与家庭教育的内在逻辑关系，重在推导而非说教。不要分点，不要列举。

## 三、普通家长案例
只写一段话。描述一个具体的、真实感强的日常场景，让读者感觉这是真实发生的事情。要有具体的情境（如：周末早上、放学后、饭桌上等），具体的对话或行为，具体的后果。用\"有位妈妈\"、\"一个孩子\"等泛称，不要用具体人名。场景要贴近生活，是普通家长容易犯的常见问题。

## 四、智慧家长案例
只写一段话。针对上面普通家长案例中的同一个具体场景，描述另一位家长如何运用这段经典的智慧做出不同的选择。要有同样具体的情境、对话或行为、以及积极的结果。让读者能清晰对比两种做法的差异。"
    )
}

/// 构建完整的生成请求体
pub fn build_request(text: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": build_prompt(text) }] }],
        "generationConfig": {
            "temperature": TEMPERATURE,
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
        }
    })
}

/// 从生成 API 的响应中取出模型文本（`candidates[0].content.parts[0].text`）
pub fn extract_text(response: &Value) -> Option<&str> {
    response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
}

/// 从上游错误响应中取出错误信息（`error.message`）
pub fn extract_error_message(response: &Value) -> Option<&str> {
    response.pointer("/error/message").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_shape() {
        let request = build_request("大学之道，在明明德。");
        let prompt = request["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("原文：\n大学之道，在明明德。\n"));
        for heading in ["## 一、白话文解释", "## 二、家庭教育智慧", "## 三、普通家长案例", "## 四、智慧家长案例"] {
            assert!(prompt.contains(heading));
        }
        assert_eq!(request["generationConfig"]["temperature"], 0.7);
        assert_eq!(request["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_extract_text() {
        let response = json!({"candidates": [{"content": {"parts": [{"text": "解读"}]}}]});
        assert_eq!(extract_text(&response), Some("解读"));
        assert_eq!(extract_text(&json!({"candidates": []})), None);
    }

    #[test]
    fn test_extract_error_message() {
        let response = json!({"error": {"code": 400, "message": "API key not valid"}});
        assert_eq!(extract_error_message(&response), Some("API key not valid"));
        assert_eq!(extract_error_message(&json!({"error": "plain"})), None);
    }
}
