//! Service wiring shared by the subcommands.

use chrono::{NaiveDate, Utc};
use lifeos_core::notify::{Notification, NotificationSink};
use lifeos_core::{Config, GeminiClient, LifeOs, SqliteStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub type App = LifeOs<SqliteStore, GeminiClient>;

/// Prints notifications to stderr so stdout stays machine-readable.
pub struct StderrSink;

impl NotificationSink for StderrSink {
    fn notify(&self, notification: Notification) {
        let label = serde_json::to_value(notification.severity)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        eprintln!("[{label}] {}", notification.message);
    }
}

/// Open the database and connect the service.
pub fn open() -> Result<App, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    debug!(database = %config.storage.database_file, model = %config.ai.model, "opening life os");
    let store = Arc::new(SqliteStore::open(&config)?);
    let client = GeminiClient::from_config(&config.ai);
    Ok(LifeOs::connect(store, client, Arc::new(StderrSink), config.tasks.clone())?)
}

/// Calendar date used for reviews.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Error for an operation that was refused; the reason was already notified.
pub fn refused(what: &str) -> Box<dyn std::error::Error> {
    format!("{what} failed").into()
}
