//! # 访问统计数据模型
//!
//! 定义了持久化到 `analytics.json` 的统计文档结构，以及汇总接口返回的结构。
//!
//! 文档格式与历史数据文件保持兼容：
//! - 字段名使用 camelCase
//! - 时间戳使用 Unix 毫秒数
//! - 访问事件的 `chapter` 缺省时写为 `null`
//!
//! ```json
//! {
//!   "summary": { "totalUniqueUsers": 1, "totalAiUsage": 0, "totalPageViews": 1 },
//!   "users": {
//!     "u_lx3k2_abc": {
//!       "firstVisit": 1760000000000, "lastVisit": 1760000000000,
//!       "pageViews": 1, "aiUsage": 0,
//!       "visits": [{ "timestamp": 1760000000000, "type": "page", "chapter": null }]
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 每个用户保留的最大访问事件数，超出时丢弃最早的事件
pub const MAX_VISITS_PER_USER: usize = 100;

/// 访问事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitKind {
    /// 页面/章节浏览
    Page,
    /// AI 解读使用
    Ai,
}

/// 单次访问事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitEvent {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "type")]
    pub kind: VisitKind,

    /// 发生事件时所在的章节名；首页浏览等场景为 None
    #[serde(default)]
    pub chapter: Option<String>,
}

/// 单个匿名用户的统计记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub first_visit: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_visit: DateTime<Utc>,

    pub page_views: u64,

    pub ai_usage: u64,

    /// 最近的访问事件（按时间顺序，最多 `MAX_VISITS_PER_USER` 条）
    #[serde(default)]
    pub visits: Vec<VisitEvent>,
}

impl UserRecord {
    /// 首次出现的用户：首次/最后访问时间均为 `now`，计数清零
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            first_visit: now,
            last_visit: now,
            page_views: 0,
            ai_usage: 0,
            visits: Vec::new(),
        }
    }

    /// 追加一条事件并截断到最近 `MAX_VISITS_PER_USER` 条
    pub fn push_visit(&mut self, event: VisitEvent) {
        self.visits.push(event);
        if self.visits.len() > MAX_VISITS_PER_USER {
            let overflow = self.visits.len() - MAX_VISITS_PER_USER;
            self.visits.drain(..overflow);
        }
    }
}

/// 全局计数器
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounters {
    pub total_unique_users: u64,
    pub total_ai_usage: u64,
    pub total_page_views: u64,
}

/// 持久化的统计文档
///
/// 不变式：
/// - `summary.total_unique_users == users.len()`
/// - `summary.total_page_views == Σ user.page_views`
/// - `summary.total_ai_usage == Σ user.ai_usage`
///
/// 并发写入时这些不变式可能被打破（见 `services::analytics` 的说明）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsDocument {
    #[serde(default)]
    pub summary: SummaryCounters,

    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
}

/// 上报接口的确认回执，始终为 `{ "success": true }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackAck {
    pub success: bool,
}

impl TrackAck {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// ============ 汇总接口返回结构 ============

/// 汇总概览
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOverview {
    pub total_unique_users: u64,
    pub total_page_views: u64,
    pub total_ai_usage: u64,
    /// 最后访问在过去 24 小时内的用户数
    pub daily_active_users: u64,
    /// 最后访问在过去 7 天内的用户数
    pub weekly_active_users: u64,
    pub daily_page_views: u64,
    pub daily_ai_usage: u64,
    pub weekly_page_views: u64,
    pub weekly_ai_usage: u64,
}

/// 单个用户的展示统计
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStat {
    /// 截断后的用户标识（前 8 个字符 + "..."）
    pub user_id: String,
    pub first_visit: DateTime<Utc>,
    pub last_visit: DateTime<Utc>,
    pub total_page_views: u64,
    pub total_ai_usage: u64,
    /// 日均页面访问（保留两位小数）
    pub page_views_per_day: f64,
    /// 日均 AI 使用（保留两位小数）
    pub ai_usage_per_day: f64,
}

/// `GET /api/analytics/summary` 的完整返回
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub overview: SummaryOverview,
    /// 按最后访问时间倒序
    pub users: Vec<UserStat>,
    pub generated_at: DateTime<Utc>,
}
