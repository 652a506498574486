//! Session-scoped record cache, keyed by normalized name

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::exercises::ExerciseRecord;

/// Process-local map from cache key to record.
///
/// No eviction: exercise-name cardinality is small. Last write wins.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, ExerciseRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<ExerciseRecord> {
        self.read().get(key).cloned()
    }

    pub fn insert(&self, key: String, record: ExerciseRecord) {
        self.write().insert(key, record);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ExerciseRecord>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ExerciseRecord>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_insert_and_get() {
        let cache = MemoryCache::new();
        assert!(cache.is_empty());
        cache.insert("hack squat".into(), ExerciseRecord::new("Hack Squat", vec![]));
        assert!(cache.contains("hack squat"));
        assert_eq!(cache.get("hack squat").unwrap().name, "Hack Squat");
        assert!(cache.get("front squat").is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let cache = MemoryCache::new();
        cache.insert(
            "row".into(),
            ExerciseRecord::new("Row", vec![]).with_category("Barbell"),
        );
        cache.insert("row".into(), ExerciseRecord::new("Row", vec![]));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("row").unwrap().category, None);
    }

    #[test]
    fn test_clear() {
        let cache = MemoryCache::new();
        cache.insert("a".into(), ExerciseRecord::new("A", vec![]));
        cache.clear();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_concurrent_writers_different_keys() {
        let cache = Arc::new(MemoryCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        let key = format!("ex {} {}", i, j);
                        cache.insert(key.clone(), ExerciseRecord::new(key, vec![]));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 400);
    }
}
