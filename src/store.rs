//! Shared in-memory result store.
//!
//! Every append and every read takes the same lock, so exporters and the
//! results endpoint never see a partially written record. The lock is a
//! `std::sync::Mutex` and is never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::ScrapedRecord;

/// Append-only, ordered sequence of records shared by workers, the flusher,
/// and the results endpoint.
///
/// Cloning is cheap and yields a handle to the same store.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    records: Arc<Mutex<Vec<ScrapedRecord>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Records are only ever pushed, so a panic while holding the lock cannot
    // leave a torn vector behind; recover instead of propagating the poison.
    fn lock(&self) -> MutexGuard<'_, Vec<ScrapedRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds a record to the end of the store.
    pub fn append(&self, record: ScrapedRecord) {
        self.lock().push(record);
    }

    /// Returns a copy of all records in append order.
    pub fn snapshot(&self) -> Vec<ScrapedRecord> {
        self.lock().clone()
    }

    /// Runs `f` over the records while the lock is held.
    ///
    /// Used by exporters so that serialization happens inside the critical
    /// section instead of on a copy.
    pub fn with_records<R>(&self, f: impl FnOnce(&[ScrapedRecord]) -> R) -> R {
        let guard = self.lock();
        f(&guard)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_append_preserves_order() {
        let store = ResultStore::new();
        store.append(ScrapedRecord::new("a", "/a"));
        store.append(ScrapedRecord::new("b", "/b"));
        store.append(ScrapedRecord::new("a", "/a"));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].title, "a");
        assert_eq!(snapshot[1].title, "b");
        // duplicates are kept
        assert_eq!(snapshot[0], snapshot[2]);
    }

    #[test]
    fn test_clone_shares_storage() {
        let store = ResultStore::new();
        let handle = store.clone();
        handle.append(ScrapedRecord::new("x", "y"));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let store = ResultStore::new();
        store.append(ScrapedRecord::new("first", "1"));
        let snapshot = store.snapshot();
        store.append(ScrapedRecord::new("second", "2"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let store = ResultStore::new();
        let threads = 8;
        let per_thread = 500;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..per_thread {
                        store.append(ScrapedRecord::new(format!("{t}-{i}"), format!("/{t}/{i}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("append thread panicked");
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), threads * per_thread);
        let unique: HashSet<_> = snapshot.iter().map(|r| r.title.clone()).collect();
        assert_eq!(unique.len(), threads * per_thread);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_from_tasks() {
        let store = ResultStore::new();
        let mut set = tokio::task::JoinSet::new();
        for t in 0..16 {
            let store = store.clone();
            set.spawn(async move {
                for i in 0..100 {
                    store.append(ScrapedRecord::new(format!("{t}"), format!("{i}")));
                    if i % 10 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            });
        }
        while let Some(res) = set.join_next().await {
            res.expect("task panicked");
        }
        assert_eq!(store.len(), 1600);
    }

    #[test]
    fn test_with_records_sees_current_contents() {
        let store = ResultStore::new();
        assert_eq!(store.with_records(|records| records.len()), 0);
        store.append(ScrapedRecord::new("t", "l"));
        let titles = store.with_records(|records| {
            records.iter().map(|r| r.title.clone()).collect::<Vec<_>>()
        });
        assert_eq!(titles, vec!["t".to_string()]);
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let store = ResultStore::new();
        store.append(ScrapedRecord::new("kept", "/kept"));
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            poisoner.with_records(|_| panic!("poison the lock"));
        })
        .join();

        store.append(ScrapedRecord::new("after", "/after"));
        assert_eq!(store.len(), 2);
    }
}
