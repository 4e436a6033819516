//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::VisitlogError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 页面浏览记录错误
/// - 6000-6099: 统计错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    TokenInvalid = 2002,

    // 页面浏览记录错误 3000-3099
    PageViewInvalidPath = 3000,
    PageViewStoreFailed = 3001,

    // Analytics 错误 6000-6099
    AnalyticsQueryFailed = 6000,
}

impl From<VisitlogError> for ErrorCode {
    fn from(err: VisitlogError) -> Self {
        match err {
            VisitlogError::Validation(_) => ErrorCode::BadRequest,
            VisitlogError::Repository(_) => ErrorCode::PageViewStoreFailed,
            VisitlogError::StorageUnavailable(_) | VisitlogError::DatabaseConnection(_) => {
                ErrorCode::ServiceUnavailable
            }
            VisitlogError::DatabaseConfig(_)
            | VisitlogError::Serialization(_)
            | VisitlogError::FileOperation(_) => ErrorCode::InternalServerError,
        }
    }
}
