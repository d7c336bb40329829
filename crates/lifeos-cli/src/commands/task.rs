//! To-do list commands.

use clap::Subcommand;
use lifeos_core::task::{self, Task};
use lifeos_core::Pillar;

use crate::app::{self, print_json, refused, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        text: String,
        /// Pillar credited on completion
        #[arg(long, default_value = "Mind")]
        pillar: Pillar,
        /// XP awarded on completion (default from config)
        #[arg(long)]
        points: Option<u32>,
    },
    /// List open tasks by priority
    List {
        /// Include completed tasks, in stored order
        #[arg(long)]
        all: bool,
    },
    /// Toggle a task's completion
    Done {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Let the AI split a goal into subtasks
    Split {
        /// Goal to split
        goal: String,
        #[arg(long, default_value = "Mind")]
        pillar: Pillar,
        /// Point budget shared by the subtasks (default from config)
        #[arg(long)]
        points: Option<u32>,
    },
    /// Let the AI set priorities on open tasks
    Prioritize,
}

fn line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!(
        "[{mark}] {} ({}, {} XP, {}) {}",
        task.text,
        task.pillar,
        task.points,
        task.priority.as_str(),
        task.id
    )
}

pub async fn run(action: TaskAction) -> CliResult {
    let app = app::open()?;

    match action {
        TaskAction::Add { text, pillar, points } => {
            let task = app.add_task(&text, pillar, points).ok_or_else(|| refused("task add"))?;
            println!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List { all } => {
            let tasks = if all {
                app.state().tasks
            } else {
                app.sorted_open_tasks()
            };
            for task in &tasks {
                println!("{}", line(task));
            }
        }
        TaskAction::Done { id } => {
            let task = app.toggle_task(&id).ok_or_else(|| refused("task done"))?;
            println!("{}", line(&task));
        }
        TaskAction::Delete { id } => {
            if !app.delete_task(&id) {
                return Err(refused("task delete"));
            }
            println!("Task deleted: {id}");
        }
        TaskAction::Split { goal, pillar, points } => {
            let added = app.subdivide_task(&goal, pillar, points).await;
            if added.is_empty() {
                return Err(refused("task split"));
            }
            print_json(&added)?;
        }
        TaskAction::Prioritize => {
            if !app.prioritize_tasks().await {
                return Err(refused("task prioritize"));
            }
            let state = app.state();
            for task in task::sorted_open_tasks(&state.tasks) {
                println!("{}", line(task));
            }
        }
    }
    Ok(())
}
