//! Persistence tests: documents written through the service survive a reopen.

mod common;

use common::Scripted;
use lifeos_core::config::TasksConfig;
use lifeos_core::notify::NotificationLog;
use lifeos_core::store::{self, DocumentStore};
use lifeos_core::{AppState, LifeOs, Pillar, SqliteStore, StoreKey, Task};
use std::sync::Arc;

fn open(path: &std::path::Path) -> LifeOs<SqliteStore, Scripted> {
    let store = Arc::new(SqliteStore::open_path(path).unwrap());
    LifeOs::connect(store, Scripted::new(), Arc::new(NotificationLog::new()), TasksConfig::default())
        .unwrap()
}

#[test]
fn test_first_open_seeds_every_document() {
    let dir = tempfile::tempdir().unwrap();
    let app = open(&dir.path().join("lifeos.db"));
    for key in StoreKey::ALL {
        assert!(app.store().get(key).unwrap().is_some(), "missing {key}");
    }
    assert_eq!(app.state(), AppState::default());
}

#[test]
fn test_task_list_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lifeos.db");

    let written = {
        let app = open(&path);
        let a = app.add_task("Stretch", Pillar::Body, Some(5)).unwrap();
        app.add_task("Call mum", Pillar::Relationships, None).unwrap();
        app.toggle_task(&a.id).unwrap();
        app.save_memory("Early riser");
        app.state()
    };

    let app = open(&path);
    let reread = app.state();
    assert_eq!(reread.tasks, written.tasks);
    assert_eq!(reread.pillars.xp(Pillar::Body), 5);
    assert_eq!(reread.memory, "Early riser");
}

#[test]
fn test_stored_task_document_shape() {
    let store = SqliteStore::open_memory().unwrap();
    let mut task = Task::new("Read", Pillar::Mind, 10);
    task.parent = Some("Read more".into());
    store::save(&store, StoreKey::TodoList, &vec![task.clone()]).unwrap();

    let raw = store.get(StoreKey::TodoList).unwrap().unwrap();
    assert_eq!(raw[0]["text"], "Read");
    assert_eq!(raw[0]["pillar"], "Mind");
    assert_eq!(raw[0]["completed"], false);

    let back: Vec<Task> = store::load(&store, StoreKey::TodoList).unwrap();
    assert_eq!(back, vec![task]);
}
