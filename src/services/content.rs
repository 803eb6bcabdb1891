//! # 原文内容加载服务
//!
//! 负责把静态数据集中的扁平段落列表归组为有序章节：
//! - 固定章节表：经一章 + 传一至十章 + 朱子补传（挂在传五章之下）
//! - 分节映射：数据集中的 "传十章 - 第N章" 映射为 "传N章"
//! - 段落为空的章节被丢弃
//!
//! 另外提供原文清洗（去除书名横幅、注记、章节标题行），
//! 供 AI 提示词构建和命令行展示使用。

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::passage::{Chapter, ChapterCategory, PassageRecord};

/// 章节表中的一行
struct ChapterDef {
    key: &'static str,
    subtitle: &'static str,
    category: ChapterCategory,
    parent_key: Option<&'static str>,
}

const fn jing(key: &'static str, subtitle: &'static str) -> ChapterDef {
    ChapterDef {
        key,
        subtitle,
        category: ChapterCategory::Jing,
        parent_key: None,
    }
}

const fn zhuan(key: &'static str, subtitle: &'static str) -> ChapterDef {
    ChapterDef {
        key,
        subtitle,
        category: ChapterCategory::Zhuan,
        parent_key: None,
    }
}

/// 固定章节表（顺序即展示顺序）
const CHAPTER_TABLE: &[ChapterDef] = &[
    jing(
        "经一章",
        "三纲领（明明德、亲民、止于至善）、八条目（格致诚正、修齐治平）",
    ),
    zhuan("传一章", "释明明德"),
    zhuan("传二章", "释新民"),
    zhuan("传三章", "释止于至善"),
    zhuan("传四章", "释本末"),
    zhuan("传五章", "释格物致知"),
    ChapterDef {
        key: "朱子补传",
        subtitle: "补格物致知",
        category: ChapterCategory::Zhuan,
        parent_key: Some("传五章"),
    },
    zhuan("传六章", "释诚意"),
    zhuan("传七章", "释正心修身"),
    zhuan("传八章", "释修身齐家"),
    zhuan("传九章", "释齐家治国"),
    zhuan("传十章", "释治国平天下"),
];

/// 传文分节的中文序号
const ZHUAN_NUMERALS: [&str; 10] = ["一", "二", "三", "四", "五", "六", "七", "八", "九", "十"];

/// 将数据集中的分节名映射为章节键
///
/// - "经一章"、"朱子补传" 原样返回
/// - "传十章 - 第N章" 返回 "传N章"
/// - 其他分节名原样返回（若不在章节表中，该段落会在归组时被丢弃）
pub fn map_section(section: &str) -> String {
    section
        .strip_prefix("传十章 - 第")
        .and_then(|rest| rest.strip_suffix('章'))
        .filter(|numeral| ZHUAN_NUMERALS.contains(numeral))
        .map(|numeral| format!("传{}章", numeral))
        .unwrap_or_else(|| section.to_string())
}

/// 将段落记录归组为章节
///
/// # 参数
/// - `records` - 数据集中的全部段落（按原始顺序）
///
/// # 返回值
/// 按章节表顺序排列、且至少包含一个段落的章节列表
pub fn build_chapters(records: Vec<PassageRecord>) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = CHAPTER_TABLE
        .iter()
        .map(|def| Chapter {
            key: def.key.to_string(),
            name: def.key.to_string(),
            subtitle: def.subtitle.to_string(),
            category: def.category,
            is_sub_entry: def.parent_key.is_some(),
            parent_key: def.parent_key.map(str::to_string),
            paragraphs: Vec::new(),
        })
        .collect();

    for record in records {
        let key = map_section(&record.section);
        match chapters.iter_mut().find(|ch| ch.key == key) {
            Some(chapter) => chapter.paragraphs.push(record),
            None => log::debug!("段落 {} 的分节 {} 不在章节表中，已忽略", record.id, record.section),
        }
    }

    chapters.retain(|ch| !ch.paragraphs.is_empty());
    chapters
}

/// 读取 `data.json` 并构建章节
///
/// # 错误
/// 文件无法读取或 JSON 解析失败时返回错误
pub async fn load_chapters(path: &Path) -> Result<Vec<Chapter>, String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("读取原文数据 {} 失败: {}", path.display(), e))?;

    let records: Vec<PassageRecord> =
        serde_json::from_str(&content).map_err(|e| format!("解析原文数据失败: {}", e))?;

    Ok(build_chapters(records))
}

/// 在所有章节中按 id 查找段落，同时返回其所属章节
pub fn find_paragraph(chapters: &[Chapter], id: i64) -> Option<(&Chapter, &PassageRecord)> {
    chapters
        .iter()
        .find_map(|ch| ch.paragraph(id).map(|p| (ch, p)))
}

/// 按经/传分组的目录文本，附属条目缩进显示
pub fn render_outline(chapters: &[Chapter]) -> String {
    let mut lines = Vec::new();

    for category in [ChapterCategory::Jing, ChapterCategory::Zhuan] {
        let group: Vec<&Chapter> = chapters.iter().filter(|ch| ch.category == category).collect();
        if group.is_empty() {
            continue;
        }
        lines.push(category.heading().to_string());
        for ch in group {
            let indent = if ch.is_sub_entry { "    " } else { "  " };
            lines.push(format!(
                "{}{}：{}（{} 段）",
                indent,
                ch.name,
                ch.subtitle,
                ch.paragraphs.len()
            ));
        }
    }

    lines.join("\n")
}

static BANNER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"《大学章句》全文\n?").unwrap());
static BRACKET_NOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"【[^】]+】\n?").unwrap());
static PAREN_NOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"（[^）]+）\n?").unwrap());
static CHAPTER_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第[一二三四五六七八九十]+章\s*[^\n]*\n?").unwrap());

/// 清洗段落原文
///
/// 依次去除：书名横幅、`【…】` 标记、全角括号注记、`第X章` 标题行，最后 trim。
pub fn clean_content(content: &str) -> String {
    let text = BANNER_RE.replace_all(content, "");
    let text = BRACKET_NOTE_RE.replace_all(&text, "");
    let text = PAREN_NOTE_RE.replace_all(&text, "");
    let text = CHAPTER_HEADING_RE.replace_all(&text, "");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, section: &str) -> PassageRecord {
        PassageRecord {
            id,
            content: format!("段落{}", id),
            section: section.to_string(),
        }
    }

    #[test]
    fn test_map_section() {
        assert_eq!(map_section("经一章"), "经一章");
        assert_eq!(map_section("朱子补传"), "朱子补传");
        assert_eq!(map_section("传十章 - 第一章"), "传一章");
        assert_eq!(map_section("传十章 - 第十章"), "传十章");
        assert_eq!(map_section("附录"), "附录");
    }

    #[test]
    fn test_build_chapters_groups_in_table_order() {
        let chapters = build_chapters(vec![
            record(1, "传十章 - 第五章"),
            record(2, "经一章"),
            record(3, "朱子补传"),
            record(4, "经一章"),
            record(5, "未知分节"),
        ]);

        let keys: Vec<&str> = chapters.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["经一章", "传五章", "朱子补传"]);

        let ids: Vec<i64> = chapters[0].paragraphs.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4]);

        let sub = &chapters[2];
        assert!(sub.is_sub_entry);
        assert_eq!(sub.parent_key.as_deref(), Some("传五章"));
        assert_eq!(sub.category, ChapterCategory::Zhuan);
    }

    #[test]
    fn test_empty_dataset_has_no_chapters() {
        assert!(build_chapters(Vec::new()).is_empty());
    }

    #[test]
    fn test_find_paragraph() {
        let chapters = build_chapters(vec![record(7, "传十章 - 第二章")]);
        let (chapter, paragraph) = find_paragraph(&chapters, 7).unwrap();
        assert_eq!(chapter.key, "传二章");
        assert_eq!(paragraph.content, "段落7");
        assert!(find_paragraph(&chapters, 8).is_none());
    }

    #[test]
    fn test_render_outline() {
        let chapters = build_chapters(vec![
            record(1, "经一章"),
            record(2, "传十章 - 第五章"),
            record(3, "朱子补传"),
        ]);
        let outline = render_outline(&chapters);
        let lines: Vec<&str> = outline.lines().collect();
        assert_eq!(lines[0], "【经】（总纲）");
        assert_eq!(lines[2], "【传】（释义）");
        assert_eq!(lines[3], "  传五章：释格物致知（1 段）");
        assert_eq!(lines[4], "    朱子补传：补格物致知（1 段）");
    }

    #[test]
    fn test_clean_content() {
        let raw = "《大学章句》全文\n【经一章】\n第一章 大学之道\n大学之道，在明明德（明，彰显也），在亲民。\n";
        assert_eq!(clean_content(raw), "大学之道，在明明德，在亲民。");
        assert_eq!(clean_content("  知止而后有定。 "), "知止而后有定。");
    }

    #[tokio::test]
    async fn test_load_chapters_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[{"id":1,"content":"大学之道","section":"经一章"},
                {"id":2,"content":"康诰曰","section":"传十章 - 第一章"}]"#,
        )
        .unwrap();

        let chapters = load_chapters(&path).await.unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].key, "传一章");

        assert!(load_chapters(&dir.path().join("missing.json")).await.is_err());
    }
}
