//! Typed application state mirrored from the store.

use serde_json::Value;

use crate::error::StoreError;
use crate::finance::FinancialEntry;
use crate::goals::LifeGoal;
use crate::pillar::PillarXp;
use crate::review::DailyReviewRecord;
use crate::settings::Settings;
use crate::store::{self, decode, DocumentStore, StoreKey};
use crate::task::Task;

/// Every document the application reads, decoded with explicit defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub pillars: PillarXp,
    pub settings: Settings,
    pub streak: u32,
    pub financial: Vec<FinancialEntry>,
    pub tasks: Vec<Task>,
    pub goals: Vec<LifeGoal>,
    pub memory: String,
    /// Weekly shutdown entries. Kept opaque; nothing reads them yet.
    pub shutdowns: Vec<Value>,
    pub reviews: Vec<DailyReviewRecord>,
}

impl AppState {
    /// Read every document, using defaults for absent ones.
    pub fn load(store: &dyn DocumentStore) -> Result<Self, StoreError> {
        Ok(Self {
            pillars: store::load(store, StoreKey::Pillars)?,
            settings: store::load(store, StoreKey::Settings)?,
            streak: store::load(store, StoreKey::DailyReviewStreak)?,
            financial: store::load(store, StoreKey::FinancialData)?,
            tasks: store::load(store, StoreKey::TodoList)?,
            goals: store::load(store, StoreKey::LifeGoals)?,
            memory: store::load(store, StoreKey::AiMemories)?,
            shutdowns: store::load(store, StoreKey::SundayShutdowns)?,
            reviews: store::load(store, StoreKey::DailyReviews)?,
        })
    }

    /// Replace one slice with a pushed document. Last write wins.
    pub fn apply(&mut self, key: StoreKey, value: Value) -> Result<(), StoreError> {
        match key {
            StoreKey::Pillars => self.pillars = decode(key, value)?,
            StoreKey::Settings => self.settings = decode(key, value)?,
            StoreKey::DailyReviewStreak => self.streak = decode(key, value)?,
            StoreKey::FinancialData => self.financial = decode(key, value)?,
            StoreKey::TodoList => self.tasks = decode(key, value)?,
            StoreKey::LifeGoals => self.goals = decode(key, value)?,
            StoreKey::AiMemories => self.memory = decode(key, value)?,
            StoreKey::SundayShutdowns => self.shutdowns = decode(key, value)?,
            StoreKey::DailyReviews => self.reviews = decode(key, value)?,
        }
        Ok(())
    }
}
