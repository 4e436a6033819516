//! Admin API 服务模块
//!
//! 只读的统计端点，以及全部 HTTP 端点共用的响应信封、错误码与帮助函数。

pub mod analytics;
pub mod error_code;
mod helpers;
pub mod routes;
mod types;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{api_result, error_from_visitlog, error_response, json_response, success_response};

// 重新导出错误码
pub use error_code::ErrorCode;

pub use analytics::{get_analytics_summary, get_recent_page_views};
pub use routes::admin_v1_routes;
