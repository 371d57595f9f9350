pub mod auth;
pub mod config;
pub mod feed;
pub mod policies;
pub mod run;

use std::path::PathBuf;

use osfloor_core::{Config, KeyringToken, StaticToken, TokenSource};

use crate::GlobalArgs;

/// Resolved config file location.
pub fn config_path(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match &global.config {
        Some(path) => Ok(path.clone()),
        None => Ok(Config::default_path()?),
    }
}

pub fn load_config(global: &GlobalArgs) -> Result<Config, Box<dyn std::error::Error>> {
    let path = config_path(global)?;
    tracing::debug!(path = %path.display(), "loading configuration");
    Ok(Config::load_from(&path)?)
}

/// `--token` / OSFLOOR_GRAPH_TOKEN wins over the keyring.
pub fn token_source(global: &GlobalArgs) -> Box<dyn TokenSource> {
    match &global.token {
        Some(token) => Box::new(StaticToken::new(token.clone())),
        None => Box::new(KeyringToken),
    }
}

pub fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
