//! Open-task view captured when a prioritization prompt is built.
//!
//! The completion service answers with positional indices into this view, so
//! the same view must be used to resolve them. The fingerprint lets callers
//! detect that the list changed while the request was in flight.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{open_tasks, Task};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTaskSnapshot {
    ids: Vec<String>,
    texts: Vec<String>,
    fingerprint: String,
}

impl OpenTaskSnapshot {
    /// Capture the open tasks of `tasks` in list order.
    pub fn capture(tasks: &[Task]) -> Self {
        let open = open_tasks(tasks);
        let ids: Vec<String> = open.iter().map(|t| t.id.clone()).collect();
        let texts: Vec<String> = open.iter().map(|t| t.text.clone()).collect();
        let fingerprint = fingerprint(&open);
        Self {
            ids,
            texts,
            fingerprint,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifier of the open task at `index` when the snapshot was taken.
    pub fn resolve(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    /// `index: text` lines as presented to the completion service.
    pub fn numbered_lines(&self) -> String {
        self.texts
            .iter()
            .enumerate()
            .map(|(i, text)| format!("{i}: {text}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Whether the open view of `tasks` still matches this snapshot.
    pub fn is_current(&self, tasks: &[Task]) -> bool {
        fingerprint(&open_tasks(tasks)) == self.fingerprint
    }
}

fn fingerprint(open: &[&Task]) -> String {
    let mut hasher = Sha256::new();
    for task in open {
        hasher.update(task.id.as_bytes());
        hasher.update([0u8]);
        hasher.update(task.text.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}
