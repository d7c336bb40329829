use clap::Subcommand;
use lifeos_core::Config;

use crate::app::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the whole config
    Show,
    /// Get a config value
    Get {
        /// Dotted key (e.g. "ai.model", "tasks.default_points")
        key: String,
    },
    /// Set a config value
    Set {
        key: String,
        value: String,
    },
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
    }
    Ok(())
}
