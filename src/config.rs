//! Configuration loading and management
//!
//! Handles parsing of the optional `config.toml` in the data directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::{Priority, TaskStatus};
use crate::storage::StorageKeys;
use crate::views::DEFAULT_RECENT_LIMIT;

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Durable record naming
    #[serde(default)]
    pub storage: StorageConfig,

    /// Dashboard presentation
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Field defaults for `tf task add`
    #[serde(default)]
    pub defaults: TaskDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Prefix of every record name (`<prefix>_auth`, `<prefix>_users`, ...)
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_key_prefix() -> String {
    "tf".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of tasks in the "recent" list
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefaults {
    #[serde(default = "default_priority")]
    pub priority: Priority,

    #[serde(default = "default_status")]
    pub status: TaskStatus,
}

fn default_priority() -> Priority {
    Priority::Medium
}

fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            status: default_status(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `config.toml` from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn keys(&self) -> StorageKeys {
        StorageKeys::new(self.storage.key_prefix.trim())
    }

    fn validate(&self) -> crate::error::Result<()> {
        let prefix = self.storage.key_prefix.trim();
        if prefix.is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "storage.key_prefix cannot be empty".to_string(),
            ));
        }
        if !prefix.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(crate::error::Error::InvalidConfig(
                "storage.key_prefix must be alphanumeric".to_string(),
            ));
        }
        if self.dashboard.recent_limit == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "dashboard.recent_limit must be >= 1".to_string(),
            ));
        }
        if self.dashboard.recent_limit > 100 {
            return Err(crate::error::Error::InvalidConfig(
                "dashboard.recent_limit must be <= 100".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.storage.key_prefix, "tf");
        assert_eq!(cfg.dashboard.recent_limit, 6);
        assert_eq!(cfg.defaults.priority, Priority::Medium);
        assert_eq!(cfg.defaults.status, TaskStatus::Todo);
        assert_eq!(cfg.keys(), StorageKeys::default());
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[storage]
key_prefix = "work"

[dashboard]
recent_limit = 10

[defaults]
priority = "high"
status = "in-progress"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.storage.key_prefix, "work");
        assert_eq!(cfg.dashboard.recent_limit, 10);
        assert_eq!(cfg.defaults.priority, Priority::High);
        assert_eq!(cfg.defaults.status, TaskStatus::InProgress);
        assert_eq!(cfg.keys().session(), "work_auth");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[dashboard]\nrecent_limit = 3").expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.dashboard.recent_limit, 3);
        assert_eq!(cfg.storage.key_prefix, "tf");
        assert_eq!(cfg.defaults.priority, Priority::Medium);
    }

    #[test]
    fn invalid_prefix_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[storage]\nkey_prefix = \"a/b\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_recent_limit_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[dashboard]\nrecent_limit = 0").expect("write config");
        assert!(Config::load(&path).is_err());

        fs::write(&path, "[dashboard]\nrecent_limit = 101").expect("write config");
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn unknown_status_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[defaults]\nstatus = \"blocked\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::TomlParse(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_from_dir_defaults_when_missing_or_invalid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.storage.key_prefix, "tf");

        fs::write(dir.path().join(CONFIG_FILE), "not = [valid").expect("write config");
        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.dashboard.recent_limit, 6);
    }

    #[test]
    fn load_from_dir_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(CONFIG_FILE), "[storage]\nkey_prefix = \"home\"")
            .expect("write config");

        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.storage.key_prefix, "home");
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("key_prefix = \"tf\""));
        assert!(written.contains("priority = \"medium\""));
        assert!(written.contains("status = \"todo\""));

        let reloaded = Config::load(&path).expect("reload");
        assert_eq!(reloaded.dashboard.recent_limit, 6);
    }
}
