//! Small key-value storage capability
//!
//! Visitor identity and per-session record flags live in client-scoped
//! storage. The recorder only sees this `{get, set}` capability, so the
//! backing can be browser cookies, an in-process map, or a stub.

use dashmap::DashMap;

use crate::errors::{Result, VisitlogError};

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空所有键，用于模拟浏览会话结束
    pub fn clear(&self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage that is disabled: every access fails
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Err(VisitlogError::storage_unavailable(format!(
            "cannot read '{}': storage disabled",
            key
        )))
    }

    fn set(&self, key: &str, _value: &str) -> Result<()> {
        Err(VisitlogError::storage_unavailable(format!(
            "cannot write '{}': storage disabled",
            key
        )))
    }
}
