//! Session store factory.
//!
//! Creates the configured [`SessionStore`] so that callers depend only on the
//! trait.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use super::session_store::SessionStore;
use super::stores::{FileSessionStore, MemorySessionStore, DEFAULT_SESSION_FILE};
use crate::config::SessionSettings;
use crate::error::TimesheetResult;

/// Session store type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store, lost on exit
    Memory,
    /// JSON file on disk
    File,
}

impl FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            _ => Err(format!("Unknown session store type: {}", s)),
        }
    }
}

pub struct SessionStoreFactory;

impl SessionStoreFactory {
    /// Create a session store.
    ///
    /// # Arguments
    /// * `store_type` - Type of store to create
    /// * `path` - File location for [`StoreType::File`]; defaults to
    ///   `invoicing-session.json` in the working directory
    pub fn create(store_type: StoreType, path: Option<PathBuf>) -> Arc<dyn SessionStore> {
        match store_type {
            StoreType::Memory => Self::create_memory(),
            StoreType::File => {
                let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
                Arc::new(FileSessionStore::new(path))
            }
        }
    }

    pub fn create_memory() -> Arc<dyn SessionStore> {
        Arc::new(MemorySessionStore::new())
    }

    /// Create the store described by the `[session]` settings.
    pub fn from_settings(settings: &SessionSettings) -> TimesheetResult<Arc<dyn SessionStore>> {
        let store_type = StoreType::from_str(&settings.store)
            .map_err(crate::error::TimesheetError::ConfigurationError)?;
        let store = Self::create(store_type, settings.path.clone());
        log::info!(
            "Using {:?} session store at {}",
            store_type,
            store.describe()
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimesheetError;

    #[test]
    fn test_store_type_from_str() {
        assert_eq!(StoreType::from_str("memory").unwrap(), StoreType::Memory);
        assert_eq!(StoreType::from_str("File").unwrap(), StoreType::File);
        assert!(StoreType::from_str("azure").is_err());
    }

    #[test]
    fn test_file_store_default_path() {
        let store = SessionStoreFactory::create(StoreType::File, None);
        assert_eq!(store.describe(), DEFAULT_SESSION_FILE);
    }

    #[test]
    fn test_from_settings() {
        let settings = SessionSettings {
            store: "file".to_string(),
            path: Some(PathBuf::from("elsewhere.json")),
        };
        let store = SessionStoreFactory::from_settings(&settings).unwrap();
        assert_eq!(store.describe(), "elsewhere.json");

        let bad = SessionSettings {
            store: "sql".to_string(),
            path: None,
        };
        assert!(matches!(
            SessionStoreFactory::from_settings(&bad),
            Err(TimesheetError::ConfigurationError(_))
        ));
    }
}
