//! API 类型定义

use serde::{Deserialize, Serialize};

/// 统一响应信封 `{ code, message, data }`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// `GET /v1/analytics/page-views` 查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentPageViewsQuery {
    /// 返回数量，缺省取配置中的 `analytics.recent_limit`
    pub limit: Option<usize>,
}

/// 页面浏览信标请求体
#[derive(Debug, Clone, Deserialize)]
pub struct PageViewBeacon {
    pub page_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconAccepted {
    /// 本次请求是否产生了一条新记录
    pub recorded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_views_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// 运行秒数
    pub uptime: u64,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u32,
}
