//! HTTP 接口层：页面浏览信标、只读统计 API 与健康检查

pub mod cookie_store;
pub mod middleware;
pub mod services;

pub use cookie_store::{CookieLifetime, CookieStore};
