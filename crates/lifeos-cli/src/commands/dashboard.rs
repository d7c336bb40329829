use crate::app::{self, print_json, CliResult};

pub fn run() -> CliResult {
    let app = app::open()?;
    print_json(&app.dashboard(app::today()))
}
