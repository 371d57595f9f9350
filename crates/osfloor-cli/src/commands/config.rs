use clap::Subcommand;
use osfloor_core::Config;

use super::{config_path, load_config};
use crate::GlobalArgs;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "graph.policy_id", "feed.include")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value; comma-separated for lists
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(global: &GlobalArgs, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config(global)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(global)?;
            config.set(&key, &value)?;
            config.save_to(&config_path(global)?)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = load_config(global)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::default().save_to(&config_path(global)?)?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", config_path(global)?.display());
        }
    }
    Ok(())
}
