//! # 数据分析面板渲染服务
//!
//! 将汇总统计渲染为一个独立的 HTML 页面（`GET /api/analytics/dashboard`）。
//!
//! ## 页面结构
//! - 六张概览卡片：总用户数、总 AI 使用、总页面访问、日活、周活、今日 AI 使用
//! - 用户详情表：截断标识、首次/最后访问、各项计数与日均频率
//! - 刷新按钮与数据生成时间
//!
//! 所有插入页面的文本都经过 HTML 转义（用户标识来自客户端，不可信）。

use chrono::{DateTime, Local, Utc};

use crate::models::analytics::{AnalyticsSummary, UserStat};

const STYLE: &str = r#"        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f5f5f5;
            padding: 20px;
            color: #333;
        }
        h1 { color: #8B2323; margin-bottom: 20px; text-align: center; }
        .grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 16px;
            margin-bottom: 30px;
        }
        .card {
            background: white;
            border-radius: 12px;
            padding: 20px;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
        }
        .card h3 { font-size: 14px; color: #666; margin-bottom: 8px; }
        .card .value { font-size: 32px; font-weight: bold; color: #8B2323; }
        .card .sub { font-size: 12px; color: #999; margin-top: 4px; }
        table {
            width: 100%;
            border-collapse: collapse;
            background: white;
            border-radius: 12px;
            overflow: hidden;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
        }
        th, td { padding: 12px 16px; text-align: left; border-bottom: 1px solid #eee; }
        th { background: #8B2323; color: white; font-weight: 500; }
        tr:hover { background: #f9f9f9; }
        .refresh {
            display: block;
            margin: 20px auto;
            padding: 12px 24px;
            background: #8B2323;
            color: white;
            border: none;
            border-radius: 8px;
            cursor: pointer;
            font-size: 14px;
        }
        .refresh:hover { background: #6B1A1A; }
        .timestamp { text-align: center; color: #999; font-size: 12px; margin-top: 20px; }"#;

/// 渲染完整的面板 HTML
pub fn render_dashboard(summary: &AnalyticsSummary) -> String {
    let o = &summary.overview;
    let mut lines: Vec<String> = Vec::new();

    lines.push("<!DOCTYPE html>".into());
    lines.push("<html lang=\"zh-CN\">".into());
    lines.push("<head>".into());
    lines.push("    <meta charset=\"UTF-8\">".into());
    lines.push(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">".into(),
    );
    lines.push("    <title>阿莲读经典 - 数据分析面板</title>".into());
    lines.push("    <style>".into());
    lines.push(STYLE.into());
    lines.push("    </style>".into());
    lines.push("</head>".into());
    lines.push("<body>".into());
    lines.push("    <h1>阿莲读经典 - 数据分析面板</h1>".into());

    lines.push("    <div class=\"grid\">".into());
    lines.push(card("总用户数（去重）", o.total_unique_users, None));
    lines.push(card("总 AI 使用次数", o.total_ai_usage, None));
    lines.push(card("总页面访问次数", o.total_page_views, None));
    lines.push(card("日活用户", o.daily_active_users, Some("过去24小时")));
    lines.push(card("周活用户", o.weekly_active_users, Some("过去7天")));
    lines.push(card("今日 AI 使用", o.daily_ai_usage, Some("过去24小时")));
    lines.push("    </div>".into());

    lines.push("    <h2 style=\"margin-bottom: 16px; color: #333;\">用户详情</h2>".into());
    lines.push("    <table>".into());
    lines.push("        <thead>".into());
    lines.push(
        "            <tr><th>用户ID</th><th>首次访问</th><th>最后访问</th><th>页面访问</th>\
         <th>AI使用</th><th>页面频率/天</th><th>AI频率/天</th></tr>"
            .into(),
    );
    lines.push("        </thead>".into());
    lines.push("        <tbody>".into());
    lines.extend(summary.users.iter().map(user_row));
    lines.push("        </tbody>".into());
    lines.push("    </table>".into());

    lines.push(
        "    <button class=\"refresh\" onclick=\"location.reload()\">刷新数据</button>".into(),
    );
    lines.push(format!(
        "    <p class=\"timestamp\">数据生成时间: {}</p>",
        local_time(&summary.generated_at)
    ));
    lines.push("</body>".into());
    lines.push("</html>".into());

    lines.join("\n")
}

fn card(title: &str, value: u64, sub: Option<&str>) -> String {
    let sub = sub
        .map(|s| format!("<div class=\"sub\">{}</div>", escape_html(s)))
        .unwrap_or_default();
    format!(
        "        <div class=\"card\"><h3>{}</h3><div class=\"value\">{}</div>{}</div>",
        escape_html(title),
        value,
        sub
    )
}

fn user_row(user: &UserStat) -> String {
    format!(
        "            <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        escape_html(&user.user_id),
        local_time(&user.first_visit),
        local_time(&user.last_visit),
        user.total_page_views,
        user.total_ai_usage,
        user.page_views_per_day,
        user.ai_usage_per_day
    )
}

/// 以服务器本地时区显示时间
fn local_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y/%m/%d %H:%M:%S")
        .to_string()
}

/// 转义 HTML 特殊字符
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analytics::SummaryOverview;

    fn summary_with(users: Vec<UserStat>) -> AnalyticsSummary {
        AnalyticsSummary {
            overview: SummaryOverview {
                total_unique_users: 42,
                daily_active_users: 7,
                ..SummaryOverview::default()
            },
            users,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_dashboard_contains_overview() {
        let html = render_dashboard(&summary_with(vec![]));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<div class=\"value\">42</div>"));
        assert!(html.contains("日活用户</h3><div class=\"value\">7</div>"));
        assert!(html.contains("刷新数据"));
    }

    #[test]
    fn test_dashboard_escapes_user_id() {
        let user = UserStat {
            user_id: "<script>...".to_string(),
            first_visit: Utc::now(),
            last_visit: Utc::now(),
            total_page_views: 3,
            total_ai_usage: 1,
            page_views_per_day: 1.5,
            ai_usage_per_day: 0.5,
        };
        let html = render_dashboard(&summary_with(vec![user]));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;..."));
        assert!(html.contains("<td>1.5</td>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a&b<"c">'"#), "a&amp;b&lt;&quot;c&quot;&gt;&#39;");
    }
}
