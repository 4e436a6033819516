//! Analytics API 端点
//!
//! - `GET /analytics/summary`：完整统计快照（每次请求全量重算）
//! - `GET /analytics/page-views`：最近的页面浏览记录

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::{error, trace};

use crate::config::get_config;
use crate::services::{AnalyticsService, SnapshotStatus};

use super::error_code::ErrorCode;
use super::helpers::{api_result, json_response, success_response};
use super::types::RecentPageViewsQuery;

/// 获取统计快照
///
/// 读取失败时仍返回全零的摘要（含 7 天趋势），HTTP 状态为 503，
/// 前端据此区分"出错"与"暂无数据"。
pub async fn get_analytics_summary(service: web::Data<AnalyticsService>) -> HttpResponse {
    trace!("Admin API: computing analytics summary");
    let snapshot = service.snapshot().await;

    match snapshot.status {
        SnapshotStatus::Ready => success_response(snapshot),
        SnapshotStatus::Unavailable => {
            let message = snapshot
                .error
                .clone()
                .unwrap_or_else(|| "Analytics unavailable".to_string());
            error!("Admin API: analytics summary unavailable: {}", message);
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::AnalyticsQueryFailed,
                message,
                Some(snapshot),
            )
        }
    }
}

/// 获取最近的页面浏览记录
pub async fn get_recent_page_views(
    service: web::Data<AnalyticsService>,
    query: web::Query<RecentPageViewsQuery>,
) -> HttpResponse {
    let limit = query
        .limit
        .unwrap_or_else(|| get_config().analytics.recent_limit);
    trace!("Admin API: fetching {} recent page views", limit);
    api_result(service.recent_page_views(limit).await)
}

/// 统计路由 `/analytics`
pub fn analytics_routes() -> actix_web::Scope {
    web::scope("/analytics")
        .route("/summary", web::get().to(get_analytics_summary))
        .route("/page-views", web::get().to(get_recent_page_views))
}
