//! Review-record persistence boundary
//!
//! The scheduler never owns durable storage. Hosts implement [`ProgressStore`]
//! over their database and must serialize writes per (user, item) pair;
//! [`InMemoryProgressStore`] does so with a single lock and backs the tests.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::RecallModel;
use crate::types::ProgressKey;

/// `(user_id, item_id) -> RecallModel`, unique per pair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub user_id: String,
    pub item_id: String,
    pub model: RecallModel,
}

impl ReviewRecord {
    pub fn new(key: &ProgressKey, model: RecallModel) -> Self {
        Self {
            user_id: key.user_id.clone(),
            item_id: key.item_id.clone(),
            model,
        }
    }

    pub fn key(&self) -> ProgressKey {
        ProgressKey::new(self.user_id.clone(), self.item_id.clone())
    }
}

pub trait ProgressStore: Send + Sync {
    fn load(&self, key: &ProgressKey) -> Result<Option<ReviewRecord>>;

    fn save(&self, record: ReviewRecord) -> Result<()>;

    /// Snapshot of one user's records, optionally restricted to `item_ids`.
    ///
    /// The returned order is the tie-break order of the review queue.
    fn records_for_user(
        &self,
        user_id: &str,
        item_ids: Option<&[String]>,
    ) -> Result<Vec<ReviewRecord>>;

    /// Read-modify-write of one record.
    ///
    /// The default is a plain load followed by save; implementations backed by
    /// shared storage should override it with a transaction or compare-and-swap
    /// so concurrent attempts on the same pair cannot lose an update.
    fn update_with(
        &self,
        key: &ProgressKey,
        apply: &mut dyn FnMut(Option<ReviewRecord>) -> Result<ReviewRecord>,
    ) -> Result<ReviewRecord> {
        let current = self.load(key)?;
        let next = apply(current)?;
        self.save(next.clone())?;
        Ok(next)
    }
}

#[derive(Default)]
pub struct InMemoryProgressStore {
    records: RwLock<BTreeMap<ProgressKey, ReviewRecord>>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl ProgressStore for InMemoryProgressStore {
    fn load(&self, key: &ProgressKey) -> Result<Option<ReviewRecord>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn save(&self, record: ReviewRecord) -> Result<()> {
        self.records.write().insert(record.key(), record);
        Ok(())
    }

    fn records_for_user(
        &self,
        user_id: &str,
        item_ids: Option<&[String]>,
    ) -> Result<Vec<ReviewRecord>> {
        let records = self.records.read();
        let snapshot: Vec<ReviewRecord> = match item_ids {
            Some(items) => items
                .iter()
                .filter_map(|item_id| records.get(&ProgressKey::new(user_id, item_id.as_str())))
                .cloned()
                .collect(),
            None => records
                .values()
                .filter(|record| record.user_id == user_id)
                .cloned()
                .collect(),
        };
        Ok(snapshot)
    }

    fn update_with(
        &self,
        key: &ProgressKey,
        apply: &mut dyn FnMut(Option<ReviewRecord>) -> Result<ReviewRecord>,
    ) -> Result<ReviewRecord> {
        let mut records = self.records.write();
        let next = apply(records.get(key).cloned())?;
        records.insert(key.clone(), next.clone());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecallError;

    fn record(user: &str, item: &str) -> ReviewRecord {
        ReviewRecord::new(&ProgressKey::new(user, item), RecallModel::new(3.0, 3.0))
    }

    #[test]
    fn test_save_and_load() {
        let store = InMemoryProgressStore::new();
        assert!(store.is_empty());
        store.save(record("u1", "a")).unwrap();
        let loaded = store.load(&ProgressKey::new("u1", "a")).unwrap();
        assert_eq!(loaded, Some(record("u1", "a")));
        assert_eq!(store.load(&ProgressKey::new("u2", "a")).unwrap(), None);
    }

    #[test]
    fn test_records_for_user_filters_and_orders() {
        let store = InMemoryProgressStore::new();
        for (user, item) in [("u1", "b"), ("u1", "a"), ("u2", "a"), ("u1", "c")] {
            store.save(record(user, item)).unwrap();
        }

        let all: Vec<String> = store
            .records_for_user("u1", None)
            .unwrap()
            .into_iter()
            .map(|r| r.item_id)
            .collect();
        assert_eq!(all, vec!["a", "b", "c"]);

        let subset = ["c".to_string(), "missing".to_string(), "a".to_string()];
        let restricted: Vec<String> = store
            .records_for_user("u1", Some(&subset[..]))
            .unwrap()
            .into_iter()
            .map(|r| r.item_id)
            .collect();
        assert_eq!(restricted, vec!["c", "a"]);
    }

    #[test]
    fn test_update_with_error_keeps_previous() {
        let store = InMemoryProgressStore::new();
        let key = ProgressKey::new("u1", "a");
        store.save(record("u1", "a")).unwrap();

        let result = store.update_with(&key, &mut |_| Err(RecallError::Store("boom".into())));
        assert!(result.is_err());
        assert_eq!(store.load(&key).unwrap(), Some(record("u1", "a")));
    }

    #[test]
    fn test_update_with_creates_missing() {
        let store = InMemoryProgressStore::new();
        let key = ProgressKey::new("u1", "new");
        let created = store
            .update_with(&key, &mut |current| {
                assert!(current.is_none());
                Ok(ReviewRecord::new(&key, RecallModel::new(2.0, 2.0)))
            })
            .unwrap();
        assert_eq!(created.model.alpha, 2.0);
        assert_eq!(store.len(), 1);
    }
}
