//! Configuration type definitions

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SuiteConfResult;

use super::loader::{self, ConfigWarning};

/// Install behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Dump the resolved config to `log/conf/` in the run directory
    #[serde(default = "default_true")]
    pub log_dump: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self { log_dump: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Site name, exported as `ROSE_SITE` (empty when unset)
    #[serde(default)]
    pub site: Option<String>,

    /// Default log filter when neither `RUST_LOG` nor `-v` is given
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub install: InstallConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: None,
            log_level: default_log_level(),
            install: InstallConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> SuiteConfResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> SuiteConfResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load the user config file (if any), then apply environment overrides.
    pub fn load_or_default() -> SuiteConfResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default()
    }

    /// Apply environment variable overrides (SUITECONF_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |key| std::env::var(key).ok())
    }

    /// Site name, if set and non-empty
    pub fn site(&self) -> Option<&str> {
        self.site.as_deref().filter(|s| !s.is_empty())
    }
}
