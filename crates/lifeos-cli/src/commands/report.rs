use crate::app::{self, refused, CliResult};

pub async fn run() -> CliResult {
    let app = app::open()?;
    let report = app.generate_report().await.ok_or_else(|| refused("report"))?;
    println!("{report}");
    Ok(())
}
