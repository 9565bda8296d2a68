use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::store::{EntryStore, MemoryStore, SqliteStore, StoreResult};

/// Shared by every handler; cloning only bumps the store's refcount.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntryStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// SQLite when a database is configured, otherwise an in-memory store.
    pub fn from_config(config: &Config) -> StoreResult<Self> {
        match &config.database_path {
            Some(path) => {
                let store = SqliteStore::open(path)?;
                info!(path = %path.display(), "using SQLite entry store");
                Ok(Self::new(Arc::new(store)))
            }
            None => {
                warn!("DATABASE_URL not set; entries will not survive a restart");
                Ok(Self::in_memory())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewEntry;

    fn entry() -> NewEntry {
        NewEntry {
            date: "2024-03-05T09:00:00Z".parse().unwrap(),
            in_time: "09:00".to_string(),
            out_time: "17:00".to_string(),
            location: None,
        }
    }

    #[tokio::test]
    async fn configured_database_persists_across_states() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: Some(dir.path().join("entries.db")),
            ..Config::default()
        };

        let created = AppState::from_config(&config).unwrap().store.insert(entry()).await.unwrap();
        let restarted = AppState::from_config(&config).unwrap();
        assert_eq!(restarted.store.find_all().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn without_database_each_state_starts_empty() {
        let config = Config::default();
        AppState::from_config(&config).unwrap().store.insert(entry()).await.unwrap();
        let fresh = AppState::from_config(&config).unwrap();
        assert!(fresh.store.find_all().await.unwrap().is_empty());
    }
}
