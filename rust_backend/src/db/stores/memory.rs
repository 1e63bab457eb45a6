//! In-memory session store.
//!
//! Suitable for unit tests and for sessions that should not outlive the
//! process. Clones share the same saved content.

use std::sync::{Arc, RwLock};

use crate::db::session_store::SessionStore;
use crate::error::{TimesheetError, TimesheetResult};

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    content: Arc<RwLock<Option<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `content`, e.g. to simulate a corrupt save.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Arc::new(RwLock::new(Some(content.into()))),
        }
    }

    pub fn has_content(&self) -> bool {
        self.content.read().map(|c| c.is_some()).unwrap_or(false)
    }
}

fn poisoned() -> TimesheetError {
    TimesheetError::StorageError("session lock poisoned".to_string())
}

impl SessionStore for MemorySessionStore {
    fn read_raw(&self) -> TimesheetResult<Option<String>> {
        Ok(self.content.read().map_err(|_| poisoned())?.clone())
    }

    fn write_raw(&self, content: &str) -> TimesheetResult<()> {
        *self.content.write().map_err(|_| poisoned())? = Some(content.to_string());
        Ok(())
    }

    fn clear(&self) -> TimesheetResult<()> {
        *self.content.write().map_err(|_| poisoned())? = None;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
