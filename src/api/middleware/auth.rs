use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{AUTHORIZATION, CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use subtle::ConstantTimeEq;
use tracing::{debug, info, trace};

use crate::api::services::admin::{ApiResponse, ErrorCode};
use crate::config::get_config;

/// Admin authentication middleware
///
/// 校验 `Authorization: Bearer <admin_token>`。未配置 token 时整个 admin
/// 作用域返回 404。
#[derive(Clone, Debug, Default)]
pub struct AdminAuth {
    token: Option<String>,
}

impl AdminAuth {
    /// 使用 `api.admin_token` 配置
    pub fn from_config() -> Self {
        Self::with_token(get_config().api.admin_token.clone())
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.is_empty()).then_some(token),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            token: self.token.clone().map(Rc::from),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    token: Option<Rc<str>>,
}

impl<S, B> AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle requests when admin token is not configured
    fn handle_missing_token(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        debug!("Admin token not configured - returning 404");
        req.into_response(
            HttpResponse::NotFound()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .body("Not Found")
                .map_into_right_body(),
        )
    }

    /// Handle unauthorized requests
    fn handle_unauthorized(
        req: ServiceRequest,
        code: ErrorCode,
        message: &str,
    ) -> ServiceResponse<EitherBody<B>> {
        info!("Admin authentication failed - {}", message);
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: code as i32,
                    message: format!("Unauthorized: {}", message),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
    }
}

/// 常量时间比较，避免通过响应时间推断 token
pub fn token_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let expected = self.token.clone();

        Box::pin(async move {
            let Some(expected) = expected else {
                return Ok(Self::handle_missing_token(req));
            };

            match Self::extract_bearer_token(&req) {
                None => Ok(Self::handle_unauthorized(
                    req,
                    ErrorCode::Unauthorized,
                    "missing bearer token",
                )),
                Some(token) if token_matches(&token, &expected) => {
                    trace!("Admin authentication successful via Bearer token");
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                Some(_) => Ok(Self::handle_unauthorized(
                    req,
                    ErrorCode::TokenInvalid,
                    "invalid bearer token",
                )),
            }
        })
    }
}
