use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::graph::ExpansionOptions;
use crate::model::Region;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mstgraph: MstgraphConfig,
    #[serde(default)]
    pub expansion: ExpansionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Dataset location and defaults
#[derive(Debug, Clone, Deserialize)]
pub struct MstgraphConfig {
    pub db_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Region whose reverse index is consulted
    #[serde(default)]
    pub region: Region,
}

/// Forward expansion knobs
#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionConfig {
    #[serde(default = "default_expand_functions")]
    pub expand_functions: bool,
    /// Func types whose `vals` are not buff ids
    #[serde(default)]
    pub non_buff_func_types: Vec<i64>,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            expand_functions: default_expand_functions(),
            non_buff_func_types: Vec::new(),
        }
    }
}

impl ExpansionConfig {
    pub fn options(&self) -> ExpansionOptions {
        ExpansionOptions {
            expand_functions: self.expand_functions,
            non_buff_func_types: self.non_buff_func_types.iter().copied().collect::<HashSet<_>>(),
        }
    }
}

/// Reverse lookup cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Cached reverse lookups; 0 disables the cache
    #[serde(default = "default_reverse_capacity")]
    pub reverse_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            reverse_capacity: default_reverse_capacity(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_expand_functions() -> bool {
    true
}

fn default_reverse_capacity() -> usize {
    1024
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in MSTGRAPH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("MSTGRAPH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml(&config_str)
    }

    /// Parse and validate configuration text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse config.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.mstgraph.db_path.as_os_str().is_empty() {
            anyhow::bail!("mstgraph.db_path must not be empty");
        }

        // A bare file name lives in the current directory
        if let Some(parent) = self.mstgraph.db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                anyhow::bail!(
                    "Directory for db_path does not exist: {}. Create it or point db_path elsewhere.",
                    parent.display()
                );
            }
        }

        Ok(())
    }

    /// Get database path
    pub fn db_path(&self) -> &Path {
        &self.mstgraph.db_path
    }

    pub fn region(&self) -> Region {
        self.mstgraph.region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide cwd and env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn create_test_config(temp_dir: &TempDir) -> String {
        let db_path = temp_dir.path().canonicalize().unwrap().join("master.db");
        let db_path_str = db_path.to_str().unwrap().replace('\\', "\\\\");
        format!(
            r#"
[mstgraph]
db_path = "{}"
log_level = "debug"
region = "NA"

[expansion]
expand_functions = false
non_buff_func_types = [101, 102]

[cache]
reverse_capacity = 0
"#,
            db_path_str
        )
    }

    /// Restores cwd when dropped (e.g. on panic).
    struct CwdGuard(std::path::PathBuf);
    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }

    fn with_config_env(config_path: &std::path::Path, f: impl FnOnce()) {
        let original_config = std::env::var("MSTGRAPH_CONFIG").ok();
        std::env::set_var("MSTGRAPH_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("MSTGRAPH_CONFIG");
        if let Some(val) = original_config {
            std::env::set_var("MSTGRAPH_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, create_test_config(&temp_dir)).unwrap();
        let config_path = config_path.canonicalize().unwrap();
        let _cwd = CwdGuard(std::env::current_dir().unwrap());
        std::env::set_current_dir(temp_dir.path()).unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.mstgraph.log_level, "debug");
            assert_eq!(config.region(), Region::NA);
            assert!(!config.expansion.expand_functions);
            assert_eq!(config.cache.reverse_capacity, 0);

            let options = config.expansion.options();
            assert!(options.non_buff_func_types.contains(&101));
            assert!(!options.expand_functions);
        });
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_toml("[mstgraph]\ndb_path = \"master.db\"\n").unwrap();
        assert_eq!(config.mstgraph.log_level, "info");
        assert_eq!(config.region(), Region::JP);
        assert!(config.expansion.expand_functions);
        assert!(config.expansion.non_buff_func_types.is_empty());
        assert_eq!(config.cache.reverse_capacity, 1024);
    }

    #[test]
    fn test_config_rejects_empty_db_path() {
        let err = Config::from_toml("[mstgraph]\ndb_path = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("db_path"));
    }

    #[test]
    fn test_config_rejects_missing_db_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope").join("master.db");
        let text = format!(
            "[mstgraph]\ndb_path = \"{}\"\n",
            missing.to_str().unwrap().replace('\\', "\\\\")
        );
        let err = Config::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_config_rejects_unknown_region() {
        assert!(Config::from_toml("[mstgraph]\ndb_path = \"master.db\"\nregion = \"EU\"\n").is_err());
    }

    #[test]
    fn test_config_loads_path_from_env_file() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, create_test_config(&temp_dir)).unwrap();
        let config_path = config_path.canonicalize().unwrap();
        fs::write(
            temp_dir.path().join(".env"),
            format!("MSTGRAPH_CONFIG={}\n", config_path.display()),
        )
        .unwrap();

        let original = std::env::var("MSTGRAPH_CONFIG").ok();
        std::env::remove_var("MSTGRAPH_CONFIG");
        let _cwd = CwdGuard(std::env::current_dir().unwrap());
        std::env::set_current_dir(temp_dir.path()).unwrap();

        let config = Config::load();
        std::env::remove_var("MSTGRAPH_CONFIG");
        if let Some(v) = original {
            std::env::set_var("MSTGRAPH_CONFIG", v);
        }
        let config = config.unwrap();
        assert_eq!(config.region(), Region::NA);
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("MSTGRAPH_CONFIG").ok();
        std::env::set_var("MSTGRAPH_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("MSTGRAPH_CONFIG");
        if let Some(v) = original {
            std::env::set_var("MSTGRAPH_CONFIG", v);
        }
    }
}
