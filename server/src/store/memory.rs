use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{EntryStore, StoreResult};
use crate::dates::DateRange;
use crate::model::{Entry, EntryId, EntryPatch, NewEntry};

/// In-process collection kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<Vec<Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<Entry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn find_in_range(&self, range: &DateRange) -> StoreResult<Vec<Entry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|entry| range.contains(&entry.date))
            .cloned()
            .collect())
    }

    async fn insert(&self, input: NewEntry) -> StoreResult<Entry> {
        let entry = Entry::new(EntryId::generate(), input);
        self.entries.write().await.push(entry.clone());
        debug!(id = %entry.id, "inserted entry");
        Ok(entry)
    }

    async fn update_by_id(&self, id: &EntryId, patch: EntryPatch) -> StoreResult<Option<Entry>> {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == *id) else {
            return Ok(None);
        };
        entry.apply(patch);
        debug!(%id, "updated entry");
        Ok(Some(entry.clone()))
    }

    async fn delete_by_id(&self, id: &EntryId) -> StoreResult<Option<Entry>> {
        let mut entries = self.entries.write().await;
        let position = entries.iter().position(|entry| entry.id == *id);
        let removed = position.map(|index| entries.remove(index));
        if removed.is_some() {
            debug!(%id, "deleted entry");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};

    use crate::dates::day_range;

    fn new_entry(date: &str, in_time: &str) -> NewEntry {
        NewEntry {
            date: date.parse::<DateTime<Utc>>().unwrap(),
            in_time: in_time.to_string(),
            out_time: "17:00".to_string(),
            location: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.insert(new_entry("2024-03-05T09:00:00Z", "09:00")).await.unwrap();
        let b = store.insert(new_entry("2024-03-05T09:00:00Z", "09:00")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.find_all().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn find_in_range_includes_both_bounds() {
        let store = MemoryStore::new();
        let range = day_range(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), &Utc);
        store.insert(new_entry("2024-03-05T00:00:00.000Z", "start")).await.unwrap();
        store.insert(new_entry("2024-03-05T23:59:59.999Z", "end")).await.unwrap();
        store.insert(new_entry("2024-03-06T00:00:00.000Z", "next")).await.unwrap();
        store.insert(new_entry("2024-03-04T23:59:59.999Z", "prev")).await.unwrap();

        let found = store.find_in_range(&range).await.unwrap();
        let labels: Vec<_> = found.iter().map(|e| e.in_time.as_str()).collect();
        assert_eq!(labels, ["start", "end"]);
    }

    #[tokio::test]
    async fn update_returns_post_update_document() {
        let store = MemoryStore::new();
        let created = store.insert(new_entry("2024-03-05T09:00:00Z", "09:00")).await.unwrap();
        let patch = EntryPatch {
            location: Some(Some("Home".to_string())),
            ..EntryPatch::default()
        };

        let updated = store.update_by_id(&created.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.location.as_deref(), Some("Home"));
        assert_eq!(store.find_all().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let store = MemoryStore::new();
        let result = store
            .update_by_id(&EntryId::generate(), EntryPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_removes_only_the_matching_entry() {
        let store = MemoryStore::new();
        let keep = store.insert(new_entry("2024-03-05T09:00:00Z", "keep")).await.unwrap();
        let gone = store.insert(new_entry("2024-03-05T09:00:00Z", "gone")).await.unwrap();

        assert_eq!(store.delete_by_id(&gone.id).await.unwrap(), Some(gone.clone()));
        assert_eq!(store.delete_by_id(&gone.id).await.unwrap(), None);
        assert_eq!(store.find_all().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn clones_share_the_collection() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.insert(new_entry("2024-03-05T09:00:00Z", "09:00")).await.unwrap();
        assert_eq!(handle.find_all().await.unwrap().len(), 1);
    }
}
