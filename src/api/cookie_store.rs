//! Cookie-backed key-value storage
//!
//! The beacon runs server-side, so the browser's storage is reached through
//! cookies: a long-lived cookie stands in for local storage and a session
//! cookie (no max-age) for session storage. Writes are queued and attached
//! to the response as `Set-Cookie` headers.

use std::borrow::Cow;
use std::collections::HashMap;

use actix_web::HttpRequest;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::{COOKIE, HeaderMap};
use parking_lot::Mutex;
use tracing::{debug, trace};
use xxhash_rust::xxh64::xxh64;

use crate::errors::{Result, VisitlogError};
use crate::tracking::KeyValueStore;

/// 超过该长度或含非 token 字符的键改用摘要作为 cookie 名
const MAX_PLAIN_NAME_LEN: usize = 32;

const DIGEST_NAME_PREFIX: &str = "kv_";

/// Lifetime of the cookies a store writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieLifetime {
    /// 持久 cookie，`Max-Age` 以天计
    Durable { max_age_days: i64 },
    /// 会话 cookie，浏览器会话结束即清除
    Session,
}

pub struct CookieStore {
    lifetime: CookieLifetime,
    secure: bool,
    /// `None` when a `Cookie` header is not valid UTF-8
    values: Option<Mutex<HashMap<String, String>>>,
    pending: Mutex<Vec<Cookie<'static>>>,
}

impl CookieStore {
    pub fn from_request(req: &HttpRequest, lifetime: CookieLifetime, secure: bool) -> Self {
        Self {
            lifetime,
            secure,
            values: parse_cookie_headers(req.headers()).map(Mutex::new),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Durable store configured from `api.visitor_cookie_max_age_days`
    pub fn durable(req: &HttpRequest, max_age_days: i64, secure: bool) -> Self {
        Self::from_request(req, CookieLifetime::Durable { max_age_days }, secure)
    }

    pub fn session(req: &HttpRequest, secure: bool) -> Self {
        Self::from_request(req, CookieLifetime::Session, secure)
    }

    /// Cookie name used for a storage key.
    ///
    /// Short keys made of token characters are used as-is. Any other key,
    /// such as a session flag carrying a page path, maps to a fixed-width
    /// `kv_<xxh64>` name so each entry stays a few dozen bytes.
    pub fn cookie_name(key: &str) -> Cow<'_, str> {
        let plain = key.len() <= MAX_PLAIN_NAME_LEN
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if plain {
            Cow::Borrowed(key)
        } else {
            Cow::Owned(format!(
                "{}{:016x}",
                DIGEST_NAME_PREFIX,
                xxh64(key.as_bytes(), 0)
            ))
        }
    }

    /// Drain the cookies written through this store
    pub fn take_cookies(&self) -> Vec<Cookie<'static>> {
        std::mem::take(&mut *self.pending.lock())
    }

    fn build_cookie(&self, name: String, value: &str) -> Cookie<'static> {
        let mut cookie = Cookie::new(name, value.to_string());
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(SameSite::Lax);
        if let CookieLifetime::Durable { max_age_days } = self.lifetime {
            cookie.set_max_age(Duration::days(max_age_days));
        }
        cookie
    }

    fn values(&self) -> Result<&Mutex<HashMap<String, String>>> {
        self.values
            .as_ref()
            .ok_or_else(|| VisitlogError::storage_unavailable("cookie header is not valid UTF-8"))
    }
}

/// Collect the request's cookies one `;`-separated pair at a time.
///
/// Pairs that do not parse are skipped so that an unrelated malformed
/// cookie on the same domain does not hide the others. Only a header that
/// is not valid UTF-8 makes the whole store unavailable.
fn parse_cookie_headers(headers: &HeaderMap) -> Option<HashMap<String, String>> {
    let mut values = HashMap::new();
    for header in headers.get_all(COOKIE) {
        let raw = match header.to_str() {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Unreadable Cookie header: {}", e);
                return None;
            }
        };
        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            match Cookie::parse_encoded(pair) {
                Ok(cookie) => {
                    values.insert(cookie.name().to_string(), cookie.value().to_string());
                }
                Err(e) => trace!("Skipping malformed cookie pair: {}", e),
            }
        }
    }
    Some(values)
}

impl KeyValueStore for CookieStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values()?;
        Ok(values.lock().get(Self::cookie_name(key).as_ref()).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let values = self.values()?;
        let name = Self::cookie_name(key).into_owned();
        values.lock().insert(name.clone(), value.to_string());
        self.pending.lock().push(self.build_cookie(name, value));
        Ok(())
    }
}
