//! Pure task-list transforms.
//!
//! Every operation takes the current list and returns a new one. Persisting
//! the result is the caller's job.

use tracing::warn;

use super::{OpenTaskSnapshot, Priority, Task};
use crate::ai::reply::PriorityReply;
use crate::error::{AiError, ValidationError};
use crate::pillar::Pillar;

/// User input for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub pillar: Pillar,
    pub points: u32,
}

impl NewTask {
    pub fn new(text: impl Into<String>, pillar: Pillar, points: u32) -> Self {
        Self {
            text: text.into(),
            pillar,
            points,
        }
    }
}

/// XP earned by completing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpAward {
    pub pillar: Pillar,
    pub points: u32,
    pub task_id: String,
}

/// Result of a completion toggle.
#[derive(Debug, Clone)]
pub struct Toggle {
    pub tasks: Vec<Task>,
    /// Present only on the incomplete -> complete edge.
    pub award: Option<XpAward>,
}

/// Append one open task with a fresh identifier.
pub fn add_task(tasks: &[Task], new: NewTask) -> Result<Vec<Task>, ValidationError> {
    let text = new.text.trim();
    if text.is_empty() {
        return Err(ValidationError::empty("task text"));
    }
    let mut out = tasks.to_vec();
    out.push(Task::new(text, new.pillar, new.points));
    Ok(out)
}

/// Append one task per subtask description, splitting the point budget.
///
/// Each subtask gets `ceil(total_points / n)` points, so the sum may exceed
/// the budget by up to `n - 1`.
pub fn subdivide(
    tasks: &[Task],
    parent: &str,
    pillar: Pillar,
    total_points: u32,
    subtasks: &[String],
) -> Result<Vec<Task>, AiError> {
    if subtasks.is_empty() {
        return Err(AiError::Format("subdivision returned no tasks".into()));
    }
    let n = u32::try_from(subtasks.len())
        .map_err(|_| AiError::Format("subdivision returned too many tasks".into()))?;
    let points = total_points.div_ceil(n);

    let mut out = tasks.to_vec();
    out.extend(subtasks.iter().map(|text| {
        let mut task = Task::new(text.as_str(), pillar, points);
        task.parent = Some(parent.to_string());
        task
    }));
    Ok(out)
}

/// Apply a bucket classification to the task list.
///
/// All priorities are reset to `None` first. Indices are resolved against
/// `snapshot`, the open-task view that was sent with the prompt; indices
/// outside that view are skipped. Buckets apply High, then Medium, then Low,
/// so an index listed twice ends up in the later bucket.
pub fn prioritize(tasks: &[Task], snapshot: &OpenTaskSnapshot, reply: &PriorityReply) -> Vec<Task> {
    let mut out: Vec<Task> = tasks
        .iter()
        .cloned()
        .map(|mut t| {
            t.priority = Priority::None;
            t
        })
        .collect();

    for (priority, indices) in reply.buckets() {
        for &index in indices {
            let Some(id) = snapshot.resolve(index) else {
                warn!(index, len = snapshot.len(), "priority index outside open-task view");
                continue;
            };
            if let Some(task) = out.iter_mut().find(|t| t.id == id) {
                task.priority = priority;
            }
        }
    }
    out
}

/// Flip the completion flag of one task.
///
/// XP is awarded only on the incomplete -> complete edge observed by this
/// call. Un-completing never takes XP back, and completing again awards again.
pub fn toggle_complete(tasks: &[Task], id: &str) -> Result<Toggle, ValidationError> {
    let mut out = tasks.to_vec();
    let task = out
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| ValidationError::NotFound {
            kind: "task".into(),
            id: id.to_string(),
        })?;

    task.completed = !task.completed;
    let award = task.completed.then(|| XpAward {
        pillar: task.pillar,
        points: task.points,
        task_id: task.id.clone(),
    });
    Ok(Toggle { tasks: out, award })
}

/// Remove a task by identifier. Unknown identifiers leave the list unchanged.
pub fn delete_task(tasks: &[Task], id: &str) -> Vec<Task> {
    tasks.iter().filter(|t| t.id != id).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(text: &str) -> Task {
        Task::new(text, Pillar::Mind, 10)
    }

    #[test]
    fn test_add_appends_open_task() {
        let tasks = vec![open("existing")];
        let out = add_task(&tasks, NewTask::new("  new  ", Pillar::Body, 5)).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], tasks[0]);
        assert_eq!(out[1].text, "new");
        assert_eq!(out[1].points, 5);
        assert!(!out[1].completed);
        assert_eq!(out[1].priority, Priority::None);
    }

    #[test]
    fn test_add_rejects_blank_text() {
        assert!(add_task(&[], NewTask::new("   ", Pillar::Body, 5)).is_err());
    }

    #[test]
    fn test_subdivide_rounds_points_up() {
        let tasks = vec![open("keep me")];
        let subs: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        let out = subdivide(&tasks, "Ship v1", Pillar::Career, 10, &subs).unwrap();

        assert_eq!(out.len(), 4);
        assert_eq!(out[0], tasks[0]);
        for task in &out[1..] {
            assert_eq!(task.points, 4);
            assert_eq!(task.pillar, Pillar::Career);
            assert_eq!(task.parent.as_deref(), Some("Ship v1"));
            assert!(!task.completed);
            assert_eq!(task.priority, Priority::None);
        }
    }

    #[test]
    fn test_subdivide_rejects_empty_list() {
        let err = subdivide(&[], "Goal", Pillar::Mind, 10, &[]).unwrap_err();
        assert!(matches!(err, AiError::Format(_)));
    }

    #[test]
    fn test_prioritize_resolves_by_snapshot_position() {
        let mut tasks: Vec<Task> = (0..5).map(|i| open(&format!("t{i}"))).collect();
        let mut done = open("done");
        done.completed = true;
        done.priority = Priority::High;
        tasks.insert(1, done);

        let snapshot = OpenTaskSnapshot::capture(&tasks);
        let reply = PriorityReply {
            high: vec![2],
            medium: vec![0, 4],
            low: vec![],
        };
        let out = prioritize(&tasks, &snapshot, &reply);

        let by_text = |text: &str| out.iter().find(|t| t.text == text).unwrap().priority;
        assert_eq!(by_text("t2"), Priority::High);
        assert_eq!(by_text("t0"), Priority::Medium);
        assert_eq!(by_text("t4"), Priority::Medium);
        assert_eq!(by_text("t1"), Priority::None);
        assert_eq!(by_text("t3"), Priority::None);
        assert_eq!(by_text("done"), Priority::None);
        assert!(out.iter().find(|t| t.text == "done").unwrap().completed);
    }

    #[test]
    fn test_prioritize_skips_out_of_range() {
        let tasks = vec![open("only")];
        let snapshot = OpenTaskSnapshot::capture(&tasks);
        let reply = PriorityReply {
            high: vec![7],
            medium: vec![0],
            low: vec![],
        };
        let out = prioritize(&tasks, &snapshot, &reply);
        assert_eq!(out[0].priority, Priority::Medium);
    }

    #[test]
    fn test_toggle_awards_on_completion_edge_only() {
        let tasks = vec![open("run")];
        let id = tasks[0].id.clone();

        let first = toggle_complete(&tasks, &id).unwrap();
        assert!(first.tasks[0].completed);
        assert_eq!(first.award.as_ref().map(|a| a.points), Some(10));

        let second = toggle_complete(&first.tasks, &id).unwrap();
        assert!(!second.tasks[0].completed);
        assert!(second.award.is_none());

        let third = toggle_complete(&second.tasks, &id).unwrap();
        assert!(third.award.is_some());
    }

    #[test]
    fn test_toggle_unknown_id() {
        assert!(toggle_complete(&[open("x")], "missing").is_err());
    }

    #[test]
    fn test_delete() {
        let tasks = vec![open("a"), open("b")];
        let out = delete_task(&tasks, &tasks[0].id);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "b");
        assert_eq!(delete_task(&tasks, "nope").len(), 2);
    }
}
