use clap::Subcommand;
use lifeos_core::finance::FinancialEntry;

use crate::app::{self, print_json, refused, CliResult};

#[derive(Subcommand)]
pub enum FinanceAction {
    /// Record or replace a month
    Add {
        /// Month as YYYY-MM
        month: String,
        #[arg(long)]
        net_worth: f64,
        #[arg(long, default_value_t = 0.0)]
        income: f64,
        #[arg(long, default_value_t = 0.0)]
        expenses: f64,
    },
    /// Print the financial history
    List,
}

pub fn run(action: FinanceAction) -> CliResult {
    let app = app::open()?;

    match action {
        FinanceAction::Add {
            month,
            net_worth,
            income,
            expenses,
        } => {
            let entry = FinancialEntry::new(month, net_worth, income, expenses)?;
            if !app.upsert_financial(entry) {
                return Err(refused("finance add"));
            }
        }
        FinanceAction::List => print_json(&app.state().financial)?,
    }
    Ok(())
}
