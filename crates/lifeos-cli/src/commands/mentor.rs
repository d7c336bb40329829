use clap::Args;
use lifeos_core::ai::prompts::MENTOR_DOUBTS;

use crate::app::{self, refused, CliResult};

#[derive(Args)]
pub struct MentorArgs {
    /// Mentor to consult; omit to list mentors and doubts
    pub name: Option<String>,
    /// Index of the doubt to ask about
    #[arg(long, default_value_t = 0)]
    pub doubt: usize,
}

pub async fn run(args: MentorArgs) -> CliResult {
    let app = app::open()?;

    let Some(name) = args.name else {
        println!("Mentors:");
        for mentor in &app.state().settings.mentors {
            println!("  {mentor}");
        }
        println!("Doubts:");
        for (i, doubt) in MENTOR_DOUBTS.iter().enumerate() {
            println!("  {i}: {doubt}");
        }
        return Ok(());
    };

    let doubt = MENTOR_DOUBTS
        .get(args.doubt)
        .ok_or_else(|| format!("doubt index {} out of range (0-{})", args.doubt, MENTOR_DOUBTS.len() - 1))?;
    let answer = app
        .mentor_help(&name, doubt)
        .await
        .ok_or_else(|| refused("mentor"))?;
    println!("{answer}");
    Ok(())
}
