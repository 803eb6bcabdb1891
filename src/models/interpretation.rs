//! # AI 解读结果数据模型
//!
//! 每次用户选中段落后由解析器从模型输出中拆分得到，不做持久化。

use serde::Serialize;

/// 空段落的占位文本，前端在对应区域显示此文字
pub const SECTION_PLACEHOLDER: &str = "内容生成中...";

/// 四段式解读结果
///
/// 注意字段与标题的对应关系：第三个标题「普通家长案例」写入 `negative_case`，
/// 第四个标题「智慧家长案例」写入 `positive_case`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationResult {
    /// 白话文解释
    pub explanation: String,
    /// 家庭教育智慧
    pub principle: String,
    /// 智慧家长案例
    pub positive_case: String,
    /// 普通家长案例
    pub negative_case: String,
}

impl InterpretationResult {
    /// 四个部分是否全部非空
    pub fn is_complete(&self) -> bool {
        [
            &self.explanation,
            &self.principle,
            &self.positive_case,
            &self.negative_case,
        ]
        .iter()
        .all(|s| !s.is_empty())
    }
}

/// 空字符串时返回占位文本
pub fn display_or_placeholder(section: &str) -> &str {
    if section.trim().is_empty() {
        SECTION_PLACEHOLDER
    } else {
        section
    }
}
