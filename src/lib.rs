//! suiteconf - layered `rose-suite.conf` configuration engine
//!
//! A workflow's `rose-suite.conf` is merged with environment values, the
//! options recorded by a previous install, optional configs and command-line
//! defines. The result is projected into template variables and `[env]`
//! exports, and the command-line options are recorded once per install so a
//! reinstall reproduces them.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    CliOptions, InstallResult, InstallUseCase, LoadOptions, LoadUseCase, LoadedConfig,
    OptionHolder,
};
pub use config::Config;
pub use domain::entities::{ConfigNode, LayerOrigin, OverrideLayer};
pub use domain::services::{Projection, ProjectionContext};
pub use domain::value_objects::{TemplateValue, TemplatingSection};
pub use error::{SuiteConfError, SuiteConfResult};
pub use infrastructure::{FileLayerStore, LocalFs};
