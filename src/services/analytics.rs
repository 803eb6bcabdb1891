//! # 访问统计服务
//!
//! 以匿名客户端标识为键，记录页面浏览与 AI 使用两类事件，并提供汇总统计。
//!
//! ## 读写模型
//! 每次操作都是完整的"读取 → 修改 → 写回"：
//! - 不在内存中跨调用缓存文档
//! - 文档不存在：视为空统计
//! - 文档损坏或无法读取：记录错误日志，按空统计继续
//! - 写回失败：记录错误日志后吞掉，上报接口仍返回成功
//!
//! 统计是尽力而为的，绝不能阻断或影响用户的阅读操作。
//!
//! ## 已知竞态
//! 没有任何锁或版本控制。并发的上报请求可能交错执行各自的读写周期，
//! 后写入者覆盖整份文档，导致部分更新丢失；高并发下 `totalPageViews`
//! 可能低于真实事件数。对于低流量的学习工具，这是可以接受的取舍。
//! 如需修复，可在不改变接口的前提下为后端加单写者队列或文件锁。

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::models::analytics::{
    AnalyticsDocument, AnalyticsSummary, SummaryOverview, TrackAck, UserRecord, UserStat,
    VisitEvent, VisitKind,
};
use crate::models::identity::{ClientIdentity, truncate_for_display};
use crate::services::storage::AnalyticsBackend;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// 访问统计存储
///
/// 对外只暴露四个操作：`record_page_view`、`record_ai_usage`、`compute_summary`、`snapshot`。
#[derive(Clone)]
pub struct AnalyticsStore {
    backend: Arc<dyn AnalyticsBackend>,
}

impl AnalyticsStore {
    pub fn new(backend: Arc<dyn AnalyticsBackend>) -> Self {
        Self { backend }
    }

    /// 记录一次页面浏览
    pub async fn record_page_view(
        &self,
        identity: &ClientIdentity,
        chapter: Option<String>,
    ) -> TrackAck {
        self.record_at(identity, VisitKind::Page, chapter, now_millis())
            .await
    }

    /// 记录一次 AI 解读使用
    pub async fn record_ai_usage(
        &self,
        identity: &ClientIdentity,
        chapter: Option<String>,
    ) -> TrackAck {
        self.record_at(identity, VisitKind::Ai, chapter, now_millis())
            .await
    }

    /// 以指定时间记录一次事件
    ///
    /// 新用户会先以 `now` 初始化记录并增加去重用户数；
    /// 随后更新最后访问时间、对应计数器，并追加事件（最多保留 100 条）。
    ///
    /// # 返回值
    /// 始终返回成功回执，读写失败只记录日志
    pub async fn record_at(
        &self,
        identity: &ClientIdentity,
        kind: VisitKind,
        chapter: Option<String>,
        now: DateTime<Utc>,
    ) -> TrackAck {
        let mut doc = self.load().await;
        apply_event(&mut doc, identity, kind, chapter, now);
        self.save(&doc).await;
        TrackAck::ok()
    }

    /// 计算汇总统计（不修改文档）
    pub async fn compute_summary(&self, now: DateTime<Utc>) -> AnalyticsSummary {
        let doc = self.load().await;
        summarize(&doc, now)
    }

    /// 读取当前文档的完整快照
    pub async fn snapshot(&self) -> AnalyticsDocument {
        self.load().await
    }

    async fn load(&self) -> AnalyticsDocument {
        let content = match self.backend.load().await {
            Ok(Some(content)) => content,
            Ok(None) => return AnalyticsDocument::default(),
            Err(e) => {
                log::error!("加载统计数据失败，按空统计处理: {}", e);
                return AnalyticsDocument::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::error!("统计数据解析失败，按空统计处理: {}", e);
            AnalyticsDocument::default()
        })
    }

    async fn save(&self, doc: &AnalyticsDocument) {
        let content = match serde_json::to_string_pretty(doc) {
            Ok(content) => content,
            Err(e) => {
                log::error!("序列化统计数据失败: {}", e);
                return;
            }
        };

        if let Err(e) = self.backend.save(&content).await {
            log::error!("保存统计数据失败: {}", e);
        }
    }
}

/// 当前时间，截断到毫秒精度（与持久化格式一致）
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// 在文档上应用一次事件
fn apply_event(
    doc: &mut AnalyticsDocument,
    identity: &ClientIdentity,
    kind: VisitKind,
    chapter: Option<String>,
    now: DateTime<Utc>,
) {
    if !doc.users.contains_key(identity.as_str()) {
        doc.users
            .insert(identity.as_str().to_string(), UserRecord::new(now));
        doc.summary.total_unique_users += 1;
    }

    let Some(user) = doc.users.get_mut(identity.as_str()) else {
        return;
    };
    user.last_visit = now;
    match kind {
        VisitKind::Page => {
            user.page_views += 1;
            doc.summary.total_page_views += 1;
        }
        VisitKind::Ai => {
            user.ai_usage += 1;
            doc.summary.total_ai_usage += 1;
        }
    }
    user.push_visit(VisitEvent {
        timestamp: now,
        kind,
        chapter,
    });
}

/// 从文档计算汇总统计
///
/// - 日活/周活：最后访问时间落在过去 24 小时 / 7 天内（含边界）的用户数
/// - 日/周事件数：所有用户在对应窗口内的各类事件数
/// - 日均频率：总次数 / max(1, 首次访问至今的天数)，保留两位小数
/// - 用户列表按最后访问时间倒序
pub fn summarize(doc: &AnalyticsDocument, now: DateTime<Utc>) -> AnalyticsSummary {
    let one_day_ago = now - Duration::days(1);
    let one_week_ago = now - Duration::days(7);

    let mut overview = SummaryOverview {
        total_unique_users: doc.summary.total_unique_users,
        total_page_views: doc.summary.total_page_views,
        total_ai_usage: doc.summary.total_ai_usage,
        ..SummaryOverview::default()
    };
    let mut users = Vec::with_capacity(doc.users.len());

    for (user_id, user) in &doc.users {
        if user.last_visit >= one_day_ago {
            overview.daily_active_users += 1;
        }
        if user.last_visit >= one_week_ago {
            overview.weekly_active_users += 1;
        }

        for visit in &user.visits {
            if visit.timestamp >= one_day_ago {
                match visit.kind {
                    VisitKind::Page => overview.daily_page_views += 1,
                    VisitKind::Ai => overview.daily_ai_usage += 1,
                }
            }
            if visit.timestamp >= one_week_ago {
                match visit.kind {
                    VisitKind::Page => overview.weekly_page_views += 1,
                    VisitKind::Ai => overview.weekly_ai_usage += 1,
                }
            }
        }

        let elapsed_days = (now - user.first_visit).num_milliseconds() as f64 / MILLIS_PER_DAY;
        let days = elapsed_days.max(1.0);

        users.push(UserStat {
            user_id: truncate_for_display(user_id),
            first_visit: user.first_visit,
            last_visit: user.last_visit,
            total_page_views: user.page_views,
            total_ai_usage: user.ai_usage,
            page_views_per_day: round2(user.page_views as f64 / days),
            ai_usage_per_day: round2(user.ai_usage as f64 / days),
        });
    }

    users.sort_by(|a, b| b.last_visit.cmp(&a.last_visit));

    AnalyticsSummary {
        overview,
        users,
        generated_at: now,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
