//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::VisitlogError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 VisitlogError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_visitlog(err: &VisitlogError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err.clone());
    error_response(status, error_code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 VisitlogError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<VisitlogError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: VisitlogError = e.into();
            error_from_visitlog(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_rt::test]
    async fn test_success_response_envelope() {
        let resp = success_response(vec![1, 2, 3]);
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["code"], 0);
        assert_eq!(json["message"], "OK");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[actix_rt::test]
    async fn test_error_response_omits_data() {
        let resp = error_response(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, "nope");
        let json = body_json(resp).await;
        assert_eq!(json["code"], 1001);
        assert!(json.get("data").is_none());
    }

    #[actix_rt::test]
    async fn test_api_result_maps_error_status() {
        let result: Result<(), VisitlogError> = Err(VisitlogError::repository("db down"));
        let resp = api_result(result);
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(resp).await;
        assert_eq!(json["code"], ErrorCode::PageViewStoreFailed as i32);
        assert_eq!(json["message"], "db down");
    }
}
