use clap::Subcommand;

use crate::app::{self, refused, CliResult};

#[derive(Subcommand)]
pub enum MemoryAction {
    /// Print the stored memory
    Show,
    /// Replace the stored memory
    Set {
        text: String,
    },
}

pub fn run(action: MemoryAction) -> CliResult {
    let app = app::open()?;

    match action {
        MemoryAction::Show => println!("{}", app.state().memory),
        MemoryAction::Set { text } => {
            if !app.save_memory(&text) {
                return Err(refused("memory set"));
            }
        }
    }
    Ok(())
}
