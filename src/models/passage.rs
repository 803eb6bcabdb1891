//! # 原文段落与章节数据模型
//!
//! 定义了《大学》原文数据集（`data.json`）中的段落记录（PassageRecord）
//! 以及按固定章节表归组后的章节（Chapter）结构。
//!
//! 两者都在进程启动时构建一次，之后不再修改。

use serde::{Deserialize, Serialize};

/// 原文段落记录
///
/// 对应 `data.json` 数组中的一项：
/// ```json
/// { "id": 3, "content": "大学之道，在明明德……", "section": "经一章" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageRecord {
    /// 段落唯一标识，前端以 `data-id` 形式回传
    pub id: i64,

    /// 段落原文（可能带有 `【…】`、`（…）` 等注记，展示前需清洗）
    pub content: String,

    /// 数据集中的原始分节名（如 "传十章 - 第三章"）
    pub section: String,
}

/// 章节分类：经（总纲）或 传（释义）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChapterCategory {
    #[serde(rename = "经")]
    Jing,
    #[serde(rename = "传")]
    Zhuan,
}

impl ChapterCategory {
    /// 导航分组标题
    pub fn heading(&self) -> &'static str {
        match self {
            ChapterCategory::Jing => "【经】（总纲）",
            ChapterCategory::Zhuan => "【传】（释义）",
        }
    }
}

/// 章节
///
/// 由固定章节表中的一行加上归入该章的段落组成。
/// 段落为空的章节在构建阶段即被丢弃，不会出现在结果中。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// 章节键（如 "传五章"），同时是分节映射的目标值
    pub key: String,

    /// 显示名称
    pub name: String,

    /// 副标题（该章主旨，如 "释格物致知"）
    pub subtitle: String,

    pub category: ChapterCategory,

    /// 是否为附属条目（目前只有 "朱子补传" 挂在 "传五章" 之下）
    pub is_sub_entry: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,

    /// 按数据集原始顺序排列的段落
    pub paragraphs: Vec<PassageRecord>,
}

impl Chapter {
    /// 按 id 查找本章内的段落
    pub fn paragraph(&self, id: i64) -> Option<&PassageRecord> {
        self.paragraphs.iter().find(|p| p.id == id)
    }
}
