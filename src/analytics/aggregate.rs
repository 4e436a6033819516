//! 页面访问统计聚合
//!
//! 每次读取都基于全量事件重新计算，不做增量聚合、不持久化汇总。
//! 数据量仅为单站点访问日志；高流量场景需要服务端预聚合，不在此处理。

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::PageViewEvent;

/// 按日趋势覆盖的天数（含今天）
pub const TREND_DAYS: i64 = 7;
/// recent_views 条数上限
pub const RECENT_VIEWS_LIMIT: usize = 10;
/// 缺失设备 / 浏览器标签时使用的名称
pub const UNKNOWN_LABEL: &str = "Unknown";

const WEEK_WINDOW_DAYS: i64 = 7;
const MONTH_WINDOW_DAYS: i64 = 30;

/// 单日访问量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyViews {
    /// ISO 日期 (YYYY-MM-DD)
    pub date: String,
    pub views: u64,
}

/// 分类统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

/// 统计结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub today_views: u64,
    /// 最近 7×24 小时
    pub week_views: u64,
    /// 最近 30×24 小时
    pub month_views: u64,
    pub total_views: u64,
    pub unique_visitors: u64,
    pub unique_visitors_today: u64,
    pub device_counts: BTreeMap<String, u64>,
    pub browser_counts: BTreeMap<String, u64>,
    pub page_counts: BTreeMap<String, u64>,
    /// 固定 7 项，从旧到新，最后一项为今天
    pub views_by_day: Vec<DailyViews>,
    pub recent_views: Vec<PageViewEvent>,
}

impl AnalyticsSummary {
    /// 全零结果（仍包含 7 天趋势），用于读取失败或无数据时
    pub fn empty(now: DateTime<FixedOffset>) -> Self {
        compute_analytics(&[], now)
    }

    pub fn top_pages(&self, limit: usize) -> Vec<CategoryStats> {
        ranked(&self.page_counts, self.total_views, limit)
    }

    pub fn top_browsers(&self, limit: usize) -> Vec<CategoryStats> {
        ranked(&self.browser_counts, self.total_views, limit)
    }

    pub fn top_devices(&self, limit: usize) -> Vec<CategoryStats> {
        ranked(&self.device_counts, self.total_views, limit)
    }
}

/// Compute every derived metric from the full newest-first event list.
///
/// `now` carries the viewer's offset; "today" and the daily buckets use its
/// calendar date while the week/month windows are rolling 24h multiples.
pub fn compute_analytics(events: &[PageViewEvent], now: DateTime<FixedOffset>) -> AnalyticsSummary {
    let offset = *now.offset();
    let today = now.date_naive();
    let now_utc = now.with_timezone(&Utc);
    let week_start = now_utc - Duration::days(WEEK_WINDOW_DAYS);
    let month_start = now_utc - Duration::days(MONTH_WINDOW_DAYS);

    let mut today_views = 0u64;
    let mut week_views = 0u64;
    let mut month_views = 0u64;
    let mut visitors: HashSet<Option<&str>> = HashSet::new();
    let mut visitors_today: HashSet<Option<&str>> = HashSet::new();
    let mut device_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut browser_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut page_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut per_day: HashMap<NaiveDate, u64> = HashMap::new();

    for event in events {
        let local_date = event.created_at.with_timezone(&offset).date_naive();
        let visitor = event.visitor_id.as_deref();

        if local_date == today {
            today_views += 1;
            visitors_today.insert(visitor);
        }
        if event.created_at >= week_start {
            week_views += 1;
        }
        if event.created_at >= month_start {
            month_views += 1;
        }
        visitors.insert(visitor);

        *per_day.entry(local_date).or_insert(0) += 1;
        *device_counts
            .entry(label_or_unknown(event.device_type.as_deref()))
            .or_insert(0) += 1;
        *browser_counts
            .entry(label_or_unknown(event.browser.as_deref()))
            .or_insert(0) += 1;
        *page_counts.entry(event.page_path.clone()).or_insert(0) += 1;
    }

    let views_by_day = (0..TREND_DAYS)
        .rev()
        .map(|days_ago| {
            let date = (now - Duration::days(days_ago)).date_naive();
            DailyViews {
                date: date.format("%Y-%m-%d").to_string(),
                views: per_day.get(&date).copied().unwrap_or(0),
            }
        })
        .collect();

    AnalyticsSummary {
        today_views,
        week_views,
        month_views,
        total_views: events.len() as u64,
        unique_visitors: visitors.len() as u64,
        unique_visitors_today: visitors_today.len() as u64,
        device_counts,
        browser_counts,
        page_counts,
        views_by_day,
        recent_views: events.iter().take(RECENT_VIEWS_LIMIT).cloned().collect(),
    }
}

fn label_or_unknown(label: Option<&str>) -> String {
    match label {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => UNKNOWN_LABEL.to_string(),
    }
}

/// 按数量降序排列（数量相同按名称升序），截取前 limit 项
fn ranked(counts: &BTreeMap<String, u64>, total: u64, limit: usize) -> Vec<CategoryStats> {
    let mut entries: Vec<(&String, &u64)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(limit)
        .map(|(name, count)| CategoryStats {
            name: name.clone(),
            count: *count,
            percentage: if total > 0 {
                (*count as f64 / total as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        utc().with_ymd_and_hms(2026, 3, 14, 15, 0, 0).unwrap()
    }

    fn event(id: i64, created_at: DateTime<Utc>, visitor: Option<&str>) -> PageViewEvent {
        PageViewEvent {
            id,
            page_path: "/".to_string(),
            visitor_id: visitor.map(str::to_string),
            user_agent: None,
            referrer: None,
            device_type: Some("Desktop".to_string()),
            browser: Some("Chrome".to_string()),
            country: None,
            city: None,
            created_at,
        }
    }

    #[test]
    fn test_reference_example() {
        let now_utc = now().with_timezone(&Utc);
        let events = vec![
            event(3, now_utc - Duration::minutes(5), Some("a")),
            event(2, now_utc - Duration::minutes(10), Some("a")),
            event(1, now_utc - Duration::days(8), Some("b")),
        ];

        let summary = compute_analytics(&events, now());
        assert_eq!(summary.today_views, 2);
        assert_eq!(summary.week_views, 2);
        assert_eq!(summary.month_views, 3);
        assert_eq!(summary.total_views, 3);
        assert_eq!(summary.unique_visitors, 2);
        assert_eq!(summary.unique_visitors_today, 1);
    }

    #[test]
    fn test_empty_input_still_has_seven_days() {
        let summary = compute_analytics(&[], now());
        assert_eq!(summary.views_by_day.len(), 7);
        assert!(summary.views_by_day.iter().all(|d| d.views == 0));
        assert_eq!(summary.views_by_day.first().unwrap().date, "2026-03-08");
        assert_eq!(summary.views_by_day.last().unwrap().date, "2026-03-14");
        assert_eq!(summary.total_views, 0);
        assert!(summary.device_counts.is_empty());
        assert!(summary.recent_views.is_empty());
    }

    #[test]
    fn test_views_by_day_buckets() {
        let now_utc = now().with_timezone(&Utc);
        let events = vec![
            event(4, now_utc - Duration::hours(1), None),
            event(3, now_utc - Duration::days(1), None),
            event(2, now_utc - Duration::days(1) - Duration::hours(2), None),
            event(1, now_utc - Duration::days(7), None),
        ];

        let summary = compute_analytics(&events, now());
        let views: Vec<u64> = summary.views_by_day.iter().map(|d| d.views).collect();
        // 7 天前不在趋势内
        assert_eq!(views, vec![0, 0, 0, 0, 0, 2, 1]);
    }

    #[test]
    fn test_today_uses_viewer_offset() {
        // 2026-03-14 23:30 at UTC+2 is 21:30 UTC; an event at 22:30 UTC is
        // already 2026-03-15 for the viewer
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let viewer_now = plus_two.with_ymd_and_hms(2026, 3, 15, 0, 30, 0).unwrap();
        let late_utc = Utc.with_ymd_and_hms(2026, 3, 14, 22, 30, 0).unwrap();
        let earlier_utc = Utc.with_ymd_and_hms(2026, 3, 14, 21, 0, 0).unwrap();

        let events = vec![event(2, late_utc, Some("x")), event(1, earlier_utc, Some("y"))];
        let summary = compute_analytics(&events, viewer_now);
        assert_eq!(summary.today_views, 1);
        assert_eq!(summary.views_by_day.last().unwrap().date, "2026-03-15");
        assert_eq!(summary.views_by_day.last().unwrap().views, 1);
    }

    #[test]
    fn test_rolling_window_boundaries() {
        let now_utc = now().with_timezone(&Utc);
        let events = vec![
            event(3, now_utc - Duration::days(7), None),
            event(2, now_utc - Duration::days(7) - Duration::seconds(1), None),
            event(1, now_utc - Duration::days(30), None),
        ];

        let summary = compute_analytics(&events, now());
        assert_eq!(summary.week_views, 1);
        assert_eq!(summary.month_views, 3);
    }

    #[test]
    fn test_recent_views_capped_and_ordered() {
        let now_utc = now().with_timezone(&Utc);
        let events: Vec<PageViewEvent> = (0..15)
            .map(|i| event(100 - i, now_utc - Duration::minutes(i), None))
            .collect();

        let summary = compute_analytics(&events, now());
        assert_eq!(summary.recent_views.len(), RECENT_VIEWS_LIMIT);
        let ids: Vec<i64> = summary.recent_views.iter().map(|e| e.id).collect();
        assert_eq!(ids, (91..=100).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_breakdowns_sum_to_total() {
        let now_utc = now().with_timezone(&Utc);
        let mut events = vec![
            event(1, now_utc, Some("a")),
            event(2, now_utc, Some("b")),
            event(3, now_utc, None),
        ];
        events[1].page_path = "/contact".to_string();
        events[1].browser = Some("Safari".to_string());
        events[2].device_type = None;
        events[2].browser = Some(String::new());

        let summary = compute_analytics(&events, now());
        for counts in [
            &summary.page_counts,
            &summary.device_counts,
            &summary.browser_counts,
        ] {
            assert_eq!(counts.values().sum::<u64>(), summary.total_views);
        }
        assert_eq!(summary.device_counts.get(UNKNOWN_LABEL), Some(&1));
        assert_eq!(summary.browser_counts.get(UNKNOWN_LABEL), Some(&1));
        assert_eq!(summary.page_counts.get("/contact"), Some(&1));
    }

    #[test]
    fn test_missing_visitor_counts_as_one_visitor() {
        let now_utc = now().with_timezone(&Utc);
        let events = vec![
            event(1, now_utc, None),
            event(2, now_utc, None),
            event(3, now_utc, Some("a")),
        ];
        assert_eq!(compute_analytics(&events, now()).unique_visitors, 2);
    }

    #[test]
    fn test_top_pages_ranking() {
        let now_utc = now().with_timezone(&Utc);
        let paths = ["/", "/about", "/", "/services", "/about", "/"];
        let events: Vec<PageViewEvent> = paths
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut e = event(i as i64, now_utc, None);
                e.page_path = p.to_string();
                e
            })
            .collect();

        let top = compute_analytics(&events, now()).top_pages(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "/");
        assert_eq!(top[0].count, 3);
        assert!((top[0].percentage - 50.0).abs() < f64::EPSILON);
        assert_eq!(top[1].name, "/about");
    }

    #[test]
    fn test_empty_summary_rankings() {
        let summary = AnalyticsSummary::empty(now());
        assert!(summary.top_browsers(5).is_empty());
        assert!(summary.top_devices(5).is_empty());
    }
}
