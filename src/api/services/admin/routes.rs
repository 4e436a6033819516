//! Admin API 路由配置

use actix_web::web;

use super::analytics::analytics_routes;

/// Admin API v1 路由
pub fn admin_v1_routes() -> actix_web::Scope {
    web::scope("/v1").service(analytics_routes())
}
