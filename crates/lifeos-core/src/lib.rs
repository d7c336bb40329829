//! # Life OS Core Library
//!
//! Business logic for Life OS, a personal dashboard that scores progress
//! across five life pillars. The CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Scoring**: pure functions for pillar levels, daily-review scores and
//!   the review streak
//! - **Tasks**: a reconciler that turns task lists and AI replies into new
//!   task lists
//! - **AI protocol**: single-shot prompt/response calls with safe fallbacks
//!   and user notifications
//! - **Storage**: keyed JSON documents in SQLite with change subscriptions,
//!   plus TOML configuration
//!
//! ## Key Components
//!
//! - [`LifeOs`]: the service behind every user action
//! - [`DocumentStore`]: persistence adapter
//! - [`AiProtocol`]: completion calls with fallbacks
//! - [`Config`]: application configuration

pub mod ai;
pub mod config;
pub mod error;
pub mod finance;
pub mod goals;
pub mod notify;
pub mod pillar;
pub mod review;
pub mod service;
pub mod settings;
pub mod state;
pub mod store;
pub mod streak;
pub mod task;

pub use ai::{AiProtocol, CompletionService, GeminiClient};
pub use config::Config;
pub use error::{AiError, ConfigError, CoreError, StoreError, ValidationError};
pub use notify::{Notification, NotificationSink, Severity};
pub use pillar::{level_of, LevelProgress, Pillar, PillarXp};
pub use service::{Dashboard, LifeOs, Operation, ReviewSummary};
pub use state::AppState;
pub use store::{DocumentStore, MemoryStore, SqliteStore, StoreKey};
pub use streak::next_streak;
pub use task::{Priority, Task};
