//! Daily review commands.

use chrono::NaiveDate;
use clap::Subcommand;
use std::collections::BTreeMap;

use crate::app::{self, refused, CliResult};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// List the configured questions with their indices
    Questions,
    /// Submit today's answers
    Submit {
        /// Comma-separated indices of questions answered "yes"
        #[arg(long, value_delimiter = ',')]
        yes: Vec<usize>,
        /// Review date (YYYY-MM-DD), defaults to today (UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub async fn run(action: ReviewAction) -> CliResult {
    let app = app::open()?;

    match action {
        ReviewAction::Questions => {
            let settings = app.state().settings;
            if settings.daily_review_questions.is_empty() {
                println!("No review questions. Add one with `lifeos settings add-question`.");
            }
            for (i, q) in settings.daily_review_questions.iter().enumerate() {
                println!("{i}: {} ({}, {} XP)", q.text, q.pillar, q.points);
            }
        }
        ReviewAction::Submit { yes, date } => {
            let count = app.state().settings.daily_review_questions.len();
            let answers: BTreeMap<usize, bool> =
                (0..count).map(|i| (i, yes.contains(&i))).collect();
            let summary = app
                .submit_daily_review(answers, date.unwrap_or_else(app::today))
                .await
                .ok_or_else(|| refused("review submit"))?;

            println!("Score: {}", summary.record.total_score);
            println!("{}", summary.streak.describe());
            if !summary.analysis.is_empty() {
                println!();
                println!("{}", summary.analysis);
            }
        }
    }
    Ok(())
}
