//! Persistence adapter: keyed JSON documents with change subscriptions.
//!
//! The store is the system of record. In-memory state is a cache refreshed
//! from subscription callbacks; a pushed value replaces the cached slice.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::pillar::PillarXp;
use crate::settings::Settings;

/// Document keys used by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    Pillars,
    Settings,
    DailyReviewStreak,
    FinancialData,
    TodoList,
    LifeGoals,
    AiMemories,
    SundayShutdowns,
    DailyReviews,
}

impl StoreKey {
    pub const ALL: [StoreKey; 9] = [
        StoreKey::Pillars,
        StoreKey::Settings,
        StoreKey::DailyReviewStreak,
        StoreKey::FinancialData,
        StoreKey::TodoList,
        StoreKey::LifeGoals,
        StoreKey::AiMemories,
        StoreKey::SundayShutdowns,
        StoreKey::DailyReviews,
    ];

    /// Document id in the backing store.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Pillars => "pillars",
            StoreKey::Settings => "settings",
            StoreKey::DailyReviewStreak => "dailyReviewStreak",
            StoreKey::FinancialData => "financialData",
            StoreKey::TodoList => "todoList",
            StoreKey::LifeGoals => "lifeGoals",
            StoreKey::AiMemories => "aiMemories",
            StoreKey::SundayShutdowns => "sundayShutdowns",
            StoreKey::DailyReviews => "dailyReviews",
        }
    }

    /// Seed document written when the key is first subscribed.
    pub fn default_value(&self) -> Value {
        match self {
            StoreKey::Pillars => serde_json::to_value(PillarXp::new()).unwrap_or(Value::Null),
            StoreKey::Settings => serde_json::to_value(Settings::default()).unwrap_or(Value::Null),
            StoreKey::DailyReviewStreak => Value::from(0),
            StoreKey::AiMemories => Value::String(String::new()),
            StoreKey::FinancialData
            | StoreKey::TodoList
            | StoreKey::LifeGoals
            | StoreKey::SundayShutdowns
            | StoreKey::DailyReviews => Value::Array(Vec::new()),
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change callback. Receives the full new document.
pub type OnChange = Arc<dyn Fn(&Value) + Send + Sync>;

/// Handle returned by [`DocumentStore::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub key: StoreKey,
    id: u64,
}

/// Keyed document store.
pub trait DocumentStore: Send + Sync {
    fn get(&self, key: StoreKey) -> Result<Option<Value>, StoreError>;

    /// Replace the document and notify subscribers of `key`.
    fn set(&self, key: StoreKey, value: &Value) -> Result<(), StoreError>;

    /// Register `on_change` for `key`.
    ///
    /// Seeds the default document if none exists, then delivers the current
    /// value immediately.
    fn subscribe(&self, key: StoreKey, on_change: OnChange) -> Result<Subscription, StoreError>;

    fn unsubscribe(&self, subscription: &Subscription);
}

/// Read a typed document, falling back to the key's default when absent.
pub fn load<T: DeserializeOwned>(store: &dyn DocumentStore, key: StoreKey) -> Result<T, StoreError> {
    let value = store.get(key)?.unwrap_or_else(|| key.default_value());
    decode(key, value)
}

/// Decode a raw document into its typed form.
pub fn decode<T: DeserializeOwned>(key: StoreKey, value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Malformed {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Serialize and write a typed document.
pub fn save<T: Serialize + ?Sized>(store: &dyn DocumentStore, key: StoreKey, value: &T) -> Result<(), StoreError> {
    let value = serde_json::to_value(value).map_err(|e| StoreError::Malformed {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.set(key, &value)
}

/// Subscriber bookkeeping shared by the store implementations.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: AtomicU64,
    callbacks: Mutex<HashMap<StoreKey, Vec<(u64, OnChange)>>>,
}

impl Subscribers {
    pub(crate) fn add(&self, key: StoreKey, on_change: OnChange) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut callbacks) = self.callbacks.lock() {
            callbacks.entry(key).or_default().push((id, on_change));
        }
        Subscription { key, id }
    }

    pub(crate) fn remove(&self, subscription: &Subscription) {
        if let Ok(mut callbacks) = self.callbacks.lock() {
            if let Some(list) = callbacks.get_mut(&subscription.key) {
                list.retain(|(id, _)| *id != subscription.id);
            }
        }
    }

    /// Invoke every callback for `key`. The lock is released first so
    /// callbacks may subscribe or write.
    pub(crate) fn publish(&self, key: StoreKey, value: &Value) {
        let targets: Vec<OnChange> = match self.callbacks.lock() {
            Ok(callbacks) => callbacks
                .get(&key)
                .map(|list| list.iter().map(|(_, cb)| cb.clone()).collect())
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        };
        for cb in targets {
            cb(value);
        }
    }
}

/// Shared subscribe flow: seed, register, deliver current value.
pub(crate) fn subscribe_with(
    store: &dyn DocumentStore,
    subscribers: &Subscribers,
    key: StoreKey,
    on_change: OnChange,
) -> Result<Subscription, StoreError> {
    let current = match store.get(key)? {
        Some(value) => value,
        None => {
            let seed = key.default_value();
            store.set(key, &seed)?;
            seed
        }
    };
    let subscription = subscribers.add(key, on_change.clone());
    on_change(&current);
    Ok(subscription)
}
