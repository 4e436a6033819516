//! Client-side tracking: visitor identity, UA classification and recording

pub mod classify;
pub mod identity;
pub mod kv;
pub mod recorder;

pub use classify::{Browser, DeviceType, classify_browser, classify_device};
pub use identity::{VISITOR_ID_KEY, get_or_create_visitor_id};
pub use kv::{KeyValueStore, MemoryStore, UnavailableStore};
pub use recorder::{
    ClientContext, PageViewRecorder, RecordOutcome, SESSION_FLAG_PREFIX, session_flag_key,
};
