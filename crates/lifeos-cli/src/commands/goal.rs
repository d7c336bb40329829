//! Life goal commands.

use clap::Subcommand;
use lifeos_core::Pillar;

use crate::app::{self, print_json, refused, CliResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Add a life goal
    Add {
        text: String,
        #[arg(long, default_value = "Mind")]
        pillar: Pillar,
    },
    /// List life goals
    List,
    /// Remove a life goal
    Remove {
        /// Goal ID
        id: String,
    },
    /// Ask the AI for one action towards a goal
    Suggest {
        /// Add the suggestion to the to-do list
        #[arg(long)]
        accept: bool,
    },
}

pub async fn run(action: GoalAction) -> CliResult {
    let app = app::open()?;

    match action {
        GoalAction::Add { text, pillar } => {
            let goal = app.add_goal(&text, pillar).ok_or_else(|| refused("goal add"))?;
            print_json(&goal)?;
        }
        GoalAction::List => print_json(&app.state().goals)?,
        GoalAction::Remove { id } => {
            if !app.remove_goal(&id) {
                return Err(refused("goal remove"));
            }
            println!("Goal removed: {id}");
        }
        GoalAction::Suggest { accept } => {
            let suggestion = app
                .suggest_goal_action()
                .await
                .ok_or_else(|| refused("goal suggest"))?;
            println!("{suggestion}");
            if accept {
                let task = app
                    .accept_suggestion(&suggestion)
                    .ok_or_else(|| refused("goal suggest --accept"))?;
                println!("Task created: {}", task.id);
            }
        }
    }
    Ok(())
}
