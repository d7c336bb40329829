//! To-do items.
//!
//! Tasks live in a single ordered list document. Mutations are pure list
//! rewrites (see [`reconciler`]); identifiers stay stable across rewrites.

pub mod reconciler;
pub mod snapshot;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::pillar::Pillar;

pub use reconciler::{
    add_task, delete_task, prioritize, subdivide, toggle_complete, NewTask, Toggle, XpAward,
};
pub use snapshot::OpenTaskSnapshot;

/// Priority bucket assigned by the prioritization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
    None,
}

impl Priority {
    /// Display rank: High sorts first, unprioritized last.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::None => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::None => "None",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::None
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            "none" | "" => Ok(Priority::None),
            other => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("unknown priority '{other}'"),
            }),
        }
    }
}

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, never reused
    pub id: String,
    pub text: String,
    pub pillar: Pillar,
    /// XP awarded to `pillar` on completion
    pub points: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Goal text this task was split from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Task {
    /// Create an open, unprioritized task with a fresh identifier.
    pub fn new(text: impl Into<String>, pillar: Pillar, points: u32) -> Self {
        Self {
            id: new_task_id(),
            text: text.into(),
            pillar,
            points,
            completed: false,
            priority: Priority::None,
            parent: None,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.completed
    }
}

/// Generate a fresh task identifier.
pub fn new_task_id() -> String {
    Uuid::new_v4().to_string()
}

/// Open tasks in list order. This is the view the prioritization prompt indexes.
pub fn open_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_open()).collect()
}

/// Completed tasks in list order.
pub fn completed_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.completed).collect()
}

/// Open tasks ordered for display by priority rank; ties keep list order.
pub fn sorted_open_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut open = open_tasks(tasks);
    open.sort_by_key(|t| t.priority.rank());
    open
}
