//! Typed replies for JSON-mode completions.
//!
//! Parsed JSON is validated here, immediately after the protocol returns it,
//! so nothing downstream ever sees an unchecked structure.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::AiError;
use crate::task::Priority;

/// Maximum indices accepted per priority bucket.
pub const MAX_HIGH: usize = 1;
pub const MAX_MEDIUM: usize = 3;
pub const MAX_LOW: usize = 5;

/// `{"tasks": ["...", ...]}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdivisionReply {
    pub tasks: Vec<String>,
}

#[derive(Deserialize)]
struct RawSubdivision {
    tasks: Vec<String>,
}

impl SubdivisionReply {
    pub fn from_value(value: &Value) -> Result<Self, AiError> {
        let raw: RawSubdivision = serde_json::from_value(value.clone())
            .map_err(|e| AiError::Format(format!("subdivision: {e}")))?;
        let tasks: Vec<String> = raw
            .tasks
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if tasks.is_empty() {
            return Err(AiError::Format("subdivision: 'tasks' is empty".into()));
        }
        Ok(Self { tasks })
    }
}

/// `{"high": [i], "medium": [i, ...], "low": [i, ...]}`
///
/// Indices are positions in the open-task view sent with the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityReply {
    pub high: Vec<usize>,
    pub medium: Vec<usize>,
    pub low: Vec<usize>,
}

#[derive(Deserialize)]
struct RawPriorities {
    high: Vec<usize>,
    #[serde(default)]
    medium: Vec<usize>,
    #[serde(default)]
    low: Vec<usize>,
}

impl PriorityReply {
    /// Validate a parsed reply. `high` is required; `medium` and `low`
    /// default to empty. Buckets longer than their cap are truncated.
    pub fn from_value(value: &Value) -> Result<Self, AiError> {
        let raw: RawPriorities = serde_json::from_value(value.clone())
            .map_err(|e| AiError::Format(format!("priorities: {e}")))?;
        Ok(Self {
            high: cap("high", raw.high, MAX_HIGH),
            medium: cap("medium", raw.medium, MAX_MEDIUM),
            low: cap("low", raw.low, MAX_LOW),
        })
    }

    /// Buckets in application order.
    pub fn buckets(&self) -> [(Priority, &[usize]); 3] {
        [
            (Priority::High, self.high.as_slice()),
            (Priority::Medium, self.medium.as_slice()),
            (Priority::Low, self.low.as_slice()),
        ]
    }
}

fn cap(bucket: &str, mut indices: Vec<usize>, max: usize) -> Vec<usize> {
    if indices.len() > max {
        warn!(bucket, got = indices.len(), max, "priority bucket over capacity, truncating");
        indices.truncate(max);
    }
    indices
}
