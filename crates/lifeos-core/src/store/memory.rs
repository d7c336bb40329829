use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{subscribe_with, DocumentStore, OnChange, StoreKey, Subscribers, Subscription};
use crate::error::StoreError;

/// In-process store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<StoreKey, Value>>,
    subscribers: Subscribers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        let docs = self.docs.lock().map_err(|_| StoreError::Locked)?;
        Ok(docs.get(&key).cloned())
    }

    fn set(&self, key: StoreKey, value: &Value) -> Result<(), StoreError> {
        {
            let mut docs = self.docs.lock().map_err(|_| StoreError::Locked)?;
            docs.insert(key, value.clone());
        }
        self.subscribers.publish(key, value);
        Ok(())
    }

    fn subscribe(&self, key: StoreKey, on_change: OnChange) -> Result<Subscription, StoreError> {
        subscribe_with(self, &self.subscribers, key, on_change)
    }

    fn unsubscribe(&self, subscription: &Subscription) {
        self.subscribers.remove(subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn recorder() -> (OnChange, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let cb: OnChange = Arc::new(move |v: &Value| sink.lock().unwrap().push(v.clone()));
        (cb, seen)
    }

    #[test]
    fn test_get_set() {
        let store = MemoryStore::new();
        assert!(store.get(StoreKey::AiMemories).unwrap().is_none());
        store.set(StoreKey::AiMemories, &json!("I like running")).unwrap();
        assert_eq!(store.get(StoreKey::AiMemories).unwrap(), Some(json!("I like running")));
    }

    #[test]
    fn test_subscribe_seeds_and_delivers() {
        let store = MemoryStore::new();
        let (cb, seen) = recorder();
        store.subscribe(StoreKey::TodoList, cb).unwrap();

        assert_eq!(store.get(StoreKey::TodoList).unwrap(), Some(json!([])));
        assert_eq!(seen.lock().unwrap().as_slice(), &[json!([])]);

        store.set(StoreKey::TodoList, &json!([{"id": "1"}])).unwrap();
        store.set(StoreKey::LifeGoals, &json!([{"id": "g"}])).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_subscribe_keeps_existing_document() {
        let store = MemoryStore::new();
        store.set(StoreKey::DailyReviewStreak, &json!(6)).unwrap();
        let (cb, seen) = recorder();
        store.subscribe(StoreKey::DailyReviewStreak, cb).unwrap();
        assert_eq!(seen.lock().unwrap()[0], json!(6));
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let store = MemoryStore::new();
        let (cb, seen) = recorder();
        let sub = store.subscribe(StoreKey::Pillars, cb).unwrap();
        store.unsubscribe(&sub);
        store.set(StoreKey::Pillars, &json!({})).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
