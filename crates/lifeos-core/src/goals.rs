//! Long-term life goals.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::pillar::Pillar;
use crate::task::Task;

/// Pillar given to tasks created from an accepted AI suggestion.
pub const SUGGESTION_PILLAR: Pillar = Pillar::Mind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeGoal {
    pub id: String,
    pub text: String,
    pub pillar: Pillar,
}

impl LifeGoal {
    pub fn new(text: impl Into<String>, pillar: Pillar) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            pillar,
        }
    }
}

pub fn add_goal(goals: &[LifeGoal], text: &str, pillar: Pillar) -> Result<Vec<LifeGoal>, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::empty("goal text"));
    }
    let mut out = goals.to_vec();
    out.push(LifeGoal::new(text, pillar));
    Ok(out)
}

pub fn remove_goal(goals: &[LifeGoal], id: &str) -> Vec<LifeGoal> {
    goals.iter().filter(|g| g.id != id).cloned().collect()
}

/// Goal highlighted on the dashboard, rotating daily.
pub fn goal_of_the_day(goals: &[LifeGoal], day_of_year: u32) -> Option<&LifeGoal> {
    if goals.is_empty() {
        return None;
    }
    goals.get(day_of_year as usize % goals.len())
}

/// Turn an accepted suggestion into a task. Blank suggestions are rejected.
pub fn suggestion_task(suggestion: &str, points: u32) -> Result<Task, ValidationError> {
    let text = suggestion.trim();
    if text.is_empty() {
        return Err(ValidationError::empty("suggestion"));
    }
    Ok(Task::new(text, SUGGESTION_PILLAR, points))
}
