//! 页面浏览信标
//!
//! `POST {track_prefix}/pageview`：同步完成会话标记检查与访客标识解析，
//! 插入操作在后台执行，请求立即返回 `202 Accepted`。

use actix_web::http::StatusCode;
use actix_web::http::header::{REFERER, SET_COOKIE, USER_AGENT};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, trace};

use crate::api::cookie_store::CookieStore;
use crate::api::services::admin::{ApiResponse, BeaconAccepted, ErrorCode, PageViewBeacon};
use crate::config::get_config;
use crate::errors::{Result, VisitlogError};
use crate::tracking::{ClientContext, PageViewRecorder};

/// 页面路径最大长度，与 `page_views.page_path` 列宽一致
pub const MAX_PAGE_PATH_LEN: usize = 512;

/// 校验信标中的页面路径
pub fn validate_page_path(page_path: &str) -> Result<()> {
    if page_path.is_empty() {
        return Err(VisitlogError::validation("page_path must not be empty"));
    }
    if !page_path.starts_with('/') {
        return Err(VisitlogError::validation(format!(
            "page_path must start with '/': {}",
            page_path
        )));
    }
    if page_path.chars().count() > MAX_PAGE_PATH_LEN {
        return Err(VisitlogError::validation(format!(
            "page_path exceeds {} characters",
            MAX_PAGE_PATH_LEN
        )));
    }
    Ok(())
}

/// 去掉查询串与片段，同一页面只对应一个会话标记
pub fn normalize_page_path(page_path: &str) -> &str {
    page_path
        .find(['?', '#'])
        .map_or(page_path, |end| &page_path[..end])
}

fn header_value(req: &HttpRequest, name: actix_web::http::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

pub struct TrackService;

impl TrackService {
    pub async fn post_page_view(
        req: HttpRequest,
        recorder: web::Data<PageViewRecorder>,
        beacon: web::Json<PageViewBeacon>,
    ) -> HttpResponse {
        let page_path = beacon.into_inner().page_path;
        if let Err(e) = validate_page_path(&page_path) {
            debug!("Rejected page view beacon: {}", e);
            return HttpResponse::BadRequest().json(ApiResponse::<()> {
                code: ErrorCode::PageViewInvalidPath as i32,
                message: e.message().to_string(),
                data: None,
            });
        }

        let page_path = normalize_page_path(&page_path);

        let config = get_config();
        let local = CookieStore::durable(
            &req,
            config.api.visitor_cookie_max_age_days,
            config.api.cookie_secure,
        );
        let session = CookieStore::session(&req, config.api.cookie_secure);
        let client = ClientContext::new(header_value(&req, USER_AGENT), header_value(&req, REFERER));

        let recorded = match recorder.claim_page_view(page_path, &client, &local, &session) {
            Some(view) => {
                recorder.spawn_submit(view);
                true
            }
            None => false,
        };
        trace!("Page view beacon for {}: recorded={}", page_path, recorded);

        let mut builder = HttpResponse::build(StatusCode::ACCEPTED);
        // cookie 值统一百分号编码
        for cookie in local.take_cookies().into_iter().chain(session.take_cookies()) {
            builder.append_header((SET_COOKIE, cookie.encoded().to_string()));
        }
        builder.json(ApiResponse {
            code: ErrorCode::Success as i32,
            message: "Accepted".to_string(),
            data: Some(BeaconAccepted { recorded }),
        })
    }
}

/// 信标请求体大小上限
const BEACON_PAYLOAD_LIMIT: usize = 4 * 1024;

/// 请求体解析失败时同样返回统一信封
fn beacon_json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(BEACON_PAYLOAD_LIMIT)
        .error_handler(|err, _req| {
            debug!("Malformed page view beacon: {}", err);
            let response = HttpResponse::BadRequest().json(ApiResponse::<()> {
                code: ErrorCode::BadRequest as i32,
                message: format!("Invalid request body: {}", err),
                data: None,
            });
            actix_web::error::InternalError::from_response(err, response).into()
        })
}

/// 信标路由
pub fn track_routes() -> actix_web::Scope {
    web::scope("")
        .app_data(beacon_json_config())
        .route("/pageview", web::post().to(TrackService::post_page_view))
}
