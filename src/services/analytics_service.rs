//! Analytics service layer
//!
//! Provides the analytics read path shared between the HTTP API and the CLI.
//! Every call performs one bulk read and recomputes from scratch.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::analytics::{AnalyticsSummary, Clock, SystemClock, compute_analytics};
use crate::errors::VisitlogError;
use crate::storage::{PageViewEvent, PageViewRepository};

/// `recent_page_views` 单次最多返回条数
pub const MAX_RECENT_LIMIT: usize = 100;

/// 数据状态，供展示层区分“出错”与“无数据”
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    Ready,
    Unavailable,
}

/// 统计快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub status: SnapshotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub summary: AnalyticsSummary,
}

/// Analytics 服务
pub struct AnalyticsService {
    repository: Arc<dyn PageViewRepository>,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl AnalyticsService {
    /// 使用系统时钟与 UTC 日历创建
    pub fn new(repository: Arc<dyn PageViewRepository>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock), Utc.fix())
    }

    pub fn with_clock(
        repository: Arc<dyn PageViewRepository>,
        clock: Arc<dyn Clock>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            repository,
            clock,
            offset,
        }
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        self.clock.now().with_timezone(&self.offset)
    }

    /// 获取统计汇总，读取失败时返回 Repository 错误
    pub async fn summary(&self) -> Result<AnalyticsSummary, VisitlogError> {
        let events = self.repository.fetch_all_page_views().await?;
        let summary = compute_analytics(&events, self.local_now());

        debug!(
            "Analytics: summary computed over {} page views ({} unique visitors)",
            summary.total_views, summary.unique_visitors
        );
        Ok(summary)
    }

    /// 获取统计快照；读取失败时返回全零汇总并标记 Unavailable
    pub async fn snapshot(&self) -> AnalyticsSnapshot {
        let generated_at = self.clock.now();
        match self.summary().await {
            Ok(summary) => AnalyticsSnapshot {
                status: SnapshotStatus::Ready,
                error: None,
                generated_at,
                summary,
            },
            Err(e) => {
                error!("Analytics: page views unavailable: {}", e);
                AnalyticsSnapshot {
                    status: SnapshotStatus::Unavailable,
                    error: Some(e.message().to_string()),
                    generated_at,
                    summary: AnalyticsSummary::empty(self.local_now()),
                }
            }
        }
    }

    /// 最近的页面访问，limit 上限为 MAX_RECENT_LIMIT
    pub async fn recent_page_views(
        &self,
        limit: usize,
    ) -> Result<Vec<PageViewEvent>, VisitlogError> {
        let limit = limit.min(MAX_RECENT_LIMIT);
        info!("Analytics: recent_page_views limit={}", limit);

        let mut events = self.repository.fetch_all_page_views().await?;
        events.truncate(limit);
        Ok(events)
    }
}
