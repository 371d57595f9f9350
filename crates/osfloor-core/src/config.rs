//! TOML-based configuration.
//!
//! Holds everything the sync run used to hardcode:
//! - Management API base URL and the target compliance policy id
//! - Release feed URL and title filter
//! - Description template and timestamp format for the update payload
//!
//! Configuration is stored at `~/.config/osfloor/config.toml` unless a path
//! is given explicitly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::feed::TitleFilter;

/// Management API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Id of the compliance policy whose minimum OS version is kept in sync.
    #[serde(default)]
    pub policy_id: String,
}

/// Release feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_url")]
    pub url: String,
    /// Substrings that must all appear in a title.
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    /// Substrings that must not appear in a title.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Update payload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// `{timestamp}` is replaced with the run time.
    #[serde(default = "default_description_template")]
    pub description_template: String,
    /// `chrono` strftime format for `{timestamp}`.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub update: UpdateConfig,
}

fn default_base_url() -> String {
    "https://graph.microsoft.com/beta/".into()
}
fn default_feed_url() -> String {
    "https://developer.apple.com/news/releases/rss/releases.rss".into()
}
fn default_include() -> Vec<String> {
    vec!["iOS".into(), "26".into()]
}
fn default_exclude() -> Vec<String> {
    vec!["Beta".into()]
}
fn default_description_template() -> String {
    "Minimum OS version synced from Apple releases on {timestamp}".into()
}
fn default_timestamp_format() -> String {
    "%A, %B %-d, %Y %H:%M".into()
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            policy_id: String::new(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            include: default_include(),
            exclude: default_exclude(),
            case_sensitive: false,
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            description_template: default_description_template(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

/// Returns `~/.config/osfloor[-dev]/` based on OSFLOOR_ENV.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("OSFLOOR_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("osfloor-dev")
    } else {
        base_dir.join("osfloor")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "writing default configuration");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };

        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Check that the config is usable for a sync run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.graph.policy_id.trim().is_empty() {
            return Err(ConfigError::MissingKey("graph.policy_id".into()));
        }
        for (key, value) in [("graph.base_url", &self.graph.base_url), ("feed.url", &self.feed.url)] {
            url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                key: key.into(),
                message: e.to_string(),
            })?;
        }
        if self.feed.include.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "feed.include".into(),
                message: "at least one non-empty substring is required".into(),
            });
        }
        Ok(())
    }

    /// Title filter described by the `[feed]` section.
    pub fn title_filter(&self) -> TitleFilter {
        TitleFilter {
            include: self.feed.include.clone(),
            exclude: self.feed.exclude.clone(),
            case_sensitive: self.feed.case_sensitive,
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a leaf value by dot-separated key. List values are comma-separated.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// existing type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.into(),
            message: "unknown config key".into(),
        };

        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };

        let mut current = &mut json;
        if let Some(parents) = parents {
            for part in parents.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => {
                let b = value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                    key: key.into(),
                    message: e.to_string(),
                })?;
                serde_json::Value::Bool(b)
            }
            serde_json::Value::Array(_) => serde_json::Value::Array(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| serde_json::Value::String(s.to_string()))
                    .collect(),
            ),
            serde_json::Value::String(_) => serde_json::Value::String(value.to_string()),
            _ => return Err(unknown()),
        };
        obj.insert(leaf.to_string(), new_value);

        *self = serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(())
    }
}
