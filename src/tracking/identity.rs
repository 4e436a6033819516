//! Visitor identity resolution

use tracing::debug;
use uuid::Uuid;

use super::kv::KeyValueStore;

/// Durable storage key holding the visitor identifier
pub const VISITOR_ID_KEY: &str = "visitor_id";

/// Return the persisted visitor id, creating and persisting one if absent.
///
/// A stored value that is not a UUID is treated as absent and replaced.
/// Never fails: when the store cannot be read or written, a fresh id is
/// returned for this load only.
pub fn get_or_create_visitor_id(store: &dyn KeyValueStore) -> String {
    match store.get(VISITOR_ID_KEY) {
        Ok(Some(existing)) => match Uuid::try_parse(&existing) {
            Ok(id) => return id.hyphenated().to_string(),
            Err(_) => debug!("Discarding malformed visitor id ({} bytes)", existing.len()),
        },
        Ok(None) => {}
        Err(e) => {
            debug!("Visitor id lookup failed, using transient id: {}", e);
            return new_visitor_id();
        }
    }

    let visitor_id = new_visitor_id();
    if let Err(e) = store.set(VISITOR_ID_KEY, &visitor_id) {
        debug!("Visitor id could not be persisted: {}", e);
    }
    visitor_id
}

fn new_visitor_id() -> String {
    Uuid::new_v4().to_string()
}
