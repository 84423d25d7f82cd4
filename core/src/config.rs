// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game configuration stored as TOML

use crate::host::HostPolicy;
use crate::titles::DEFAULT_POPULAR_TITLES_LIMIT;
use crate::DEFAULT_LEADERBOARD_SIZE;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Host serving article pages
    #[serde(default = "default_wiki_host")]
    pub wiki_host: String,
    /// Language edition navigation may not leave
    #[serde(default = "default_allowed_language")]
    pub allowed_language: String,
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
    /// Period of the elapsed-time display
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_popular_titles_limit")]
    pub popular_titles_limit: usize,
    /// Score file; the platform data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

fn default_wiki_host() -> String {
    "he.m.wikipedia.org".to_string()
}

fn default_allowed_language() -> String {
    "he".to_string()
}

fn default_leaderboard_size() -> usize {
    DEFAULT_LEADERBOARD_SIZE
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_popular_titles_limit() -> usize {
    DEFAULT_POPULAR_TITLES_LIMIT
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            wiki_host: default_wiki_host(),
            allowed_language: default_allowed_language(),
            leaderboard_size: default_leaderboard_size(),
            tick_interval_ms: default_tick_interval_ms(),
            popular_titles_limit: default_popular_titles_limit(),
            store_path: None,
        }
    }
}

impl RaceConfig {
    pub fn host_policy(&self) -> HostPolicy {
        HostPolicy::new(&self.allowed_language)
    }

    /// Configured score file, or `scores.cbor` in the platform data directory
    pub fn resolved_store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join("scores.cbor")),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("org", "wikirace", "wikirace").context("Failed to determine project directories")
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = project_dirs()?;

    // On macOS, use Application Support directory
    let config_dir = if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        PathBuf::from(home).join("Library/Application Support/wikirace")
    } else {
        proj_dirs.config_dir().to_path_buf()
    };

    Ok(config_dir.join("config.toml"))
}

/// Load the config from the default location, creating it if missing
pub fn load_config() -> Result<RaceConfig> {
    let config_path = get_config_path().context("Failed to determine config path")?;
    load_config_from(&config_path)
}

/// Load the config at `config_path`, writing the defaults there if missing
pub fn load_config_from(config_path: &Path) -> Result<RaceConfig> {
    if !config_path.exists() {
        tracing::info!("Config file not found, creating default at: {}", config_path.display());

        let default_config = RaceConfig::default();
        save_config_to(config_path, &default_config)?;
        return Ok(default_config);
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    toml::from_str::<RaceConfig>(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

pub fn save_config_to(config_path: &Path, config: &RaceConfig) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let toml_content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(config_path, toml_content)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    tracing::info!("Saved config to: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = RaceConfig::default();
        assert_eq!(config.wiki_host, "he.m.wikipedia.org");
        assert_eq!(config.leaderboard_size, 10);
        assert_eq!(config.tick_interval_ms, 1000);
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: RaceConfig = toml::from_str("leaderboard_size = 25\nallowed_language = \"en\"").unwrap();
        assert_eq!(config.leaderboard_size, 25);
        assert_eq!(config.wiki_host, "he.m.wikipedia.org");
        assert!(config.host_policy().allows("https://en.wikipedia.org/wiki/Rust"));
    }

    #[test]
    fn test_load_creates_default_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let first = load_config_from(&config_path)?;
        assert!(config_path.exists());

        let mut changed = first.clone();
        changed.store_path = Some(temp_dir.path().join("scores.cbor"));
        save_config_to(&config_path, &changed)?;

        let reloaded = load_config_from(&config_path)?;
        assert_eq!(reloaded, changed);
        assert_eq!(reloaded.resolved_store_path()?, temp_dir.path().join("scores.cbor"));
        Ok(())
    }
}
