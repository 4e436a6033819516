//! Once-per-session page-view recording
//!
//! A page view is recorded at most once per page path per browsing session.
//! The session flag is claimed synchronously, then the insert runs either
//! inline (`record_page_view_once`) or detached on the runtime
//! (`spawn_submit`), so callers rendering a page never wait on the store.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::classify::{classify_browser, classify_device};
use super::identity::get_or_create_visitor_id;
use super::kv::KeyValueStore;
use crate::errors::Result;
use crate::storage::{NewPageView, PageViewEvent, PageViewRepository};

/// Session storage key prefix; the full key is `pageview_{page_path}`
pub const SESSION_FLAG_PREFIX: &str = "pageview_";

const SESSION_FLAG_VALUE: &str = "true";

/// What the execution environment tells us about the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl ClientContext {
    pub fn new(user_agent: Option<String>, referrer: Option<String>) -> Self {
        Self {
            user_agent,
            referrer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded(PageViewEvent),
    AlreadyRecorded,
}

pub fn session_flag_key(page_path: &str) -> String {
    format!("{}{}", SESSION_FLAG_PREFIX, page_path)
}

pub struct PageViewRecorder {
    repository: Arc<dyn PageViewRepository>,
    /// check-then-set 的进程内互斥
    flag_lock: Mutex<()>,
}

impl PageViewRecorder {
    pub fn new(repository: Arc<dyn PageViewRepository>) -> Self {
        Self {
            repository,
            flag_lock: Mutex::new(()),
        }
    }

    /// Claim the session flag for `page_path` and build the event to submit.
    ///
    /// Returns `None` when the page was already recorded in this session.
    /// The flag is set before the event is submitted and stays set even if
    /// the submission later fails.
    pub fn claim_page_view(
        &self,
        page_path: &str,
        client: &ClientContext,
        local: &dyn KeyValueStore,
        session: &dyn KeyValueStore,
    ) -> Option<NewPageView> {
        let flag_key = session_flag_key(page_path);

        {
            let _guard = self.flag_lock.lock();
            match session.get(&flag_key) {
                Ok(Some(_)) => {
                    trace!("Page view for {} already recorded in this session", page_path);
                    return None;
                }
                Ok(None) => {}
                Err(e) => debug!("Session flag unreadable, recording without dedup: {}", e),
            }
            if let Err(e) = session.set(&flag_key, SESSION_FLAG_VALUE) {
                debug!("Session flag could not be set: {}", e);
            }
        }

        let user_agent = client.user_agent.clone().filter(|ua| !ua.is_empty());
        let referrer = client.referrer.clone().filter(|r| !r.is_empty());
        let device = classify_device(user_agent.as_deref());
        let browser = classify_browser(user_agent.as_deref());

        Some(NewPageView {
            page_path: page_path.to_string(),
            visitor_id: Some(get_or_create_visitor_id(local)),
            user_agent,
            referrer,
            device_type: Some(device.as_ref().to_string()),
            browser: Some(browser.as_ref().to_string()),
            country: None,
            city: None,
        })
    }

    /// Record `page_path` unless already recorded in this session.
    ///
    /// Submission errors are returned to the caller without retry.
    pub async fn record_page_view_once(
        &self,
        page_path: &str,
        client: &ClientContext,
        local: &dyn KeyValueStore,
        session: &dyn KeyValueStore,
    ) -> Result<RecordOutcome> {
        let Some(view) = self.claim_page_view(page_path, client, local, session) else {
            return Ok(RecordOutcome::AlreadyRecorded);
        };

        let event = self.repository.insert_page_view(view).await?;
        Ok(RecordOutcome::Recorded(event))
    }

    /// Submit a claimed page view in the background. Failures are logged and
    /// the event is dropped.
    pub fn spawn_submit(&self, view: NewPageView) -> JoinHandle<()> {
        let repository = Arc::clone(&self.repository);
        tokio::spawn(async move {
            let page_path = view.page_path.clone();
            match repository.insert_page_view(view).await {
                Ok(event) => trace!("Page view {} stored for {}", event.id, page_path),
                Err(e) => warn!("Dropping page view for {}: {}", page_path, e),
            }
        })
    }
}
