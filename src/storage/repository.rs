//! Page-view repository abstraction
//!
//! The repository is the single read path for recorded events and the only
//! write path used by the recorder. Events are never updated or deleted.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::trace;

use crate::errors::{Result, VisitlogError};
use crate::storage::{NewPageView, PageViewEvent};

#[async_trait]
pub trait PageViewRepository: Send + Sync {
    /// 单次全量读取，按 created_at 倒序（同一时间按 id 倒序）
    async fn fetch_all_page_views(&self) -> Result<Vec<PageViewEvent>>;

    /// 写入一条事件，返回带 id 与 created_at 的完整记录
    async fn insert_page_view(&self, view: NewPageView) -> Result<PageViewEvent>;

    async fn count_page_views(&self) -> Result<u64>;
}

/// In-process repository, used by tests and ad-hoc tooling
#[derive(Default)]
pub struct MemoryRepository {
    events: RwLock<Vec<PageViewEvent>>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with already-stored events (kept as-is, including created_at)
    pub fn with_events(events: Vec<PageViewEvent>) -> Self {
        let max_id = events.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            events: RwLock::new(events),
            next_id: AtomicI64::new(max_id),
            unavailable: AtomicBool::new(false),
        }
    }

    /// 模拟存储不可达，之后所有读写返回 Repository 错误
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(VisitlogError::repository("memory repository is unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl PageViewRepository for MemoryRepository {
    async fn fetch_all_page_views(&self) -> Result<Vec<PageViewEvent>> {
        self.check_available()?;
        let mut events = self.events.read().clone();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(events)
    }

    async fn insert_page_view(&self, view: NewPageView) -> Result<PageViewEvent> {
        self.check_available()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let event = view.into_event(id, Utc::now());
        trace!("MemoryRepository: inserted page view {} for {}", id, event.page_path);
        self.events.write().push(event.clone());
        Ok(event)
    }

    async fn count_page_views(&self) -> Result<u64> {
        self.check_available()?;
        Ok(self.events.read().len() as u64)
    }
}
