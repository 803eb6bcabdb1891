//! # AI 响应解析服务
//!
//! 将模型返回的一整段自由文本拆分为四段式解读结果（`InterpretationResult`）。
//!
//! ## 处理流程
//! 1. 逐行扫描，每行依次尝试四个标题模式（按规范顺序，先匹配者胜出）
//! 2. 命中标题：收尾上一段（trim 后存入），开启新段，标题所在行去掉标题部分后的剩余文本作为新段首行
//! 3. 未命中：整行（带换行符）追加到当前段；第一个标题之前的文本丢弃
//! 4. 扫描结束后收尾最后一段
//! 5. 每段去除 Markdown 粗体/斜体标记与行首 `#` 标记，再 trim
//!
//! ## 标题与字段的对应关系
//! | 序号 | 标题 | 字段 |
//! |------|------|------|
//! | 一 | 白话文解释 | `explanation` |
//! | 二 | 家庭教育智慧 | `principle` |
//! | 三 | 普通家长案例 | `negative_case` |
//! | 四 | 智慧家长案例 | `positive_case` |
//!
//! 解析器从不报错：缺失的标题对应字段为空字符串，由展示层显示占位文本。

use std::sync::LazyLock;

use regex::Regex;

use crate::models::interpretation::InterpretationResult;

/// 解读结果中的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Explanation,
    Principle,
    NegativeCase,
    PositiveCase,
}

/// 四个标题模式，按规范顺序排列
///
/// 每个模式容忍：可选的 `#`/`##` 标记、可选的序号（`一、` 或 `1.`/`1、`）、
/// 固定标题文字、以及其后任意个冒号或空白。
static SECTION_PATTERNS: LazyLock<Vec<(Section, Regex)>> = LazyLock::new(|| {
    [
        (Section::Explanation, r"(?:##?\s*)?(?:一、|1[.、])?白话文解释[：:\s]*"),
        (Section::Principle, r"(?:##?\s*)?(?:二、|2[.、])?家庭教育智慧[：:\s]*"),
        (Section::NegativeCase, r"(?:##?\s*)?(?:三、|3[.、])?普通家长案例[：:\s]*"),
        (Section::PositiveCase, r"(?:##?\s*)?(?:四、|4[.、])?智慧家长案例[：:\s]*"),
    ]
    .into_iter()
    .map(|(section, pattern)| (section, Regex::new(pattern).unwrap()))
    .collect()
});

/// 行首残留的 Markdown 标题标记
static LEADING_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#+\s*").unwrap());

/// 解析模型输出文本
///
/// # 参数
/// - `text` - 模型返回的完整文本
///
/// # 返回值
/// 四段式解读结果；未出现的段落为空字符串
pub fn parse_interpretation(text: &str) -> InterpretationResult {
    let mut result = InterpretationResult::default();
    let mut current: Option<Section> = None;
    let mut buffer = String::new();

    for line in text.split('\n') {
        let matched = SECTION_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(line));

        match matched {
            Some((section, re)) => {
                if let Some(open) = current {
                    store(&mut result, open, buffer.trim());
                }
                current = Some(*section);
                buffer = re.replacen(line, 1, "").into_owned();
                buffer.push('\n');
            }
            None if current.is_some() => {
                buffer.push_str(line);
                buffer.push('\n');
            }
            // 第一个标题之前的内容丢弃
            None => {}
        }
    }

    if let Some(open) = current {
        store(&mut result, open, buffer.trim());
    }

    for field in [
        &mut result.explanation,
        &mut result.principle,
        &mut result.positive_case,
        &mut result.negative_case,
    ] {
        *field = strip_markdown(field);
    }

    result
}

fn store(result: &mut InterpretationResult, section: Section, content: &str) {
    let slot = match section {
        Section::Explanation => &mut result.explanation,
        Section::Principle => &mut result.principle,
        Section::NegativeCase => &mut result.negative_case,
        Section::PositiveCase => &mut result.positive_case,
    };
    *slot = content.to_string();
}

/// 去除 `**`、`*` 与行首 `#` 标记
fn strip_markdown(text: &str) -> String {
    let without_emphasis = text.replace("**", "").replace('*', "");
    LEADING_HEADING_RE
        .replace_all(&without_emphasis, "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = "好的，以下是解读：\n\
\n\
## 一、白话文解释\n\
大学的宗旨，在于彰显**光明的德行**。\n\
\n\
## 二、家庭教育智慧\n\
父母先修己，孩子自然*效法*。\n\
\n\
## 三、普通家长案例\n\
周末早上，有位妈妈催促孩子起床，越催越急。\n\
\n\
## 四、智慧家长案例\n\
另一位妈妈先安排好自己的作息，孩子跟着早起。\n";

    #[test]
    fn test_parse_full_response() {
        let result = parse_interpretation(FULL_RESPONSE);
        assert_eq!(result.explanation, "大学的宗旨，在于彰显光明的德行。");
        assert_eq!(result.principle, "父母先修己，孩子自然效法。");
        assert_eq!(result.negative_case, "周末早上，有位妈妈催促孩子起床，越催越急。");
        assert_eq!(result.positive_case, "另一位妈妈先安排好自己的作息，孩子跟着早起。");
        assert!(result.is_complete());
        for section in [
            &result.explanation,
            &result.principle,
            &result.positive_case,
            &result.negative_case,
        ] {
            assert!(!section.contains("**"));
            assert_eq!(section.trim(), section.as_str());
        }
    }

    #[test]
    fn test_inline_heading_content() {
        let result = parse_interpretation("## 三、普通家长案例：周末早上孩子拖延\n妈妈大声催促。");
        assert_eq!(result.negative_case, "周末早上孩子拖延\n妈妈大声催促。");
        assert!(result.positive_case.is_empty());
    }

    #[test]
    fn test_numbering_variants() {
        let text = "1.白话文解释: 甲\n2、家庭教育智慧 乙\n# 3.普通家长案例：丙\n智慧家长案例\n丁";
        let result = parse_interpretation(text);
        assert_eq!(result.explanation, "甲");
        assert_eq!(result.principle, "乙");
        assert_eq!(result.negative_case, "丙");
        assert_eq!(result.positive_case, "丁");
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let result = parse_interpretation("## 一、白话文解释\n只有一段。");
        assert_eq!(result.explanation, "只有一段。");
        assert_eq!(result.principle, "");
        assert_eq!(result.positive_case, "");
        assert_eq!(result.negative_case, "");
        assert!(!result.is_complete());

        assert_eq!(parse_interpretation(""), InterpretationResult::default());
        assert_eq!(
            parse_interpretation("没有任何标题的文本"),
            InterpretationResult::default()
        );
    }

    #[test]
    fn test_repeated_label_overwrites() {
        let text = "## 一、白话文解释\n第一次\n## 一、白话文解释\n第二次";
        assert_eq!(parse_interpretation(text).explanation, "第二次");
    }

    #[test]
    fn test_strips_leftover_heading_markers() {
        let text = "## 二、家庭教育智慧\n### 小标题\n正文";
        assert_eq!(parse_interpretation(text).principle, "小标题\n正文");
    }
}
