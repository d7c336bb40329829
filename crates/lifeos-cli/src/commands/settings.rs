use clap::Subcommand;
use lifeos_core::review::DailyReviewQuestion;
use lifeos_core::settings::Kpi;
use lifeos_core::Pillar;

use crate::app::{self, print_json, refused, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print all settings
    Show,
    /// Add a daily review question
    AddQuestion {
        text: String,
        #[arg(long, default_value = "Mind")]
        pillar: Pillar,
        #[arg(long, default_value_t = 10)]
        points: u32,
    },
    /// Remove a daily review question by index
    RemoveQuestion {
        index: usize,
    },
    /// Track a KPI
    AddKpi {
        name: String,
        #[arg(long)]
        start: f64,
        #[arg(long)]
        current: f64,
        #[arg(long)]
        target: f64,
    },
    /// Remove a KPI by index
    RemoveKpi {
        index: usize,
    },
    /// Add a mentor
    AddMentor {
        name: String,
    },
    /// Remove a mentor by name
    RemoveMentor {
        name: String,
    },
    /// Set the budget and monthly spend used for the runway
    Budget {
        #[arg(long)]
        budget: Option<f64>,
        #[arg(long)]
        monthly_spend: Option<f64>,
    },
}

pub fn run(action: SettingsAction) -> CliResult {
    let app = app::open()?;

    let saved = match action {
        SettingsAction::Show => return print_json(&app.state().settings),
        SettingsAction::AddQuestion { text, pillar, points } => {
            app.update_settings(|s| s.add_question(DailyReviewQuestion::new(text, pillar, points)))
        }
        SettingsAction::RemoveQuestion { index } => {
            app.update_settings(|s| s.remove_question(index).map(|_| ()))
        }
        SettingsAction::AddKpi {
            name,
            start,
            current,
            target,
        } => app.update_settings(|s| s.add_kpi(Kpi::new(name, start, current, target))),
        SettingsAction::RemoveKpi { index } => app.update_settings(|s| s.remove_kpi(index).map(|_| ())),
        SettingsAction::AddMentor { name } => app.update_settings(|s| s.add_mentor(&name)),
        SettingsAction::RemoveMentor { name } => app.update_settings(|s| s.remove_mentor(&name)),
        SettingsAction::Budget {
            budget,
            monthly_spend,
        } => app.update_settings(|s| {
            if let Some(b) = budget {
                s.financial_budget = b;
            }
            if let Some(m) = monthly_spend {
                s.monthly_spend = m;
            }
            Ok(())
        }),
    };

    if !saved {
        return Err(refused("settings"));
    }
    Ok(())
}
