//! Settings for the tool itself
//!
//! Resolution order:
//! 1. Environment variables (SUITECONF_*)
//! 2. User config (`$XDG_CONFIG_HOME/suiteconf/config.toml`)
//! 3. Built-in defaults

mod loader;
mod types;

pub use loader::{user_config_path, with_env_overrides, ConfigWarning};
pub use types::{Config, InstallConfig};
