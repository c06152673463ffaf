//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `LoadUseCase` - Reads the workflow config and merges every layer
//! - `InstallUseCase` - Merges, stores the command-line layer, dumps the config log
//!
//! ## Lifecycle
//!
//! - `OptionHolder` - Command-line options that are applied once, then consumed

pub mod install;
pub mod load;
pub mod options;

pub use install::{InstallResult, InstallUseCase};
pub use load::{LoadOptions, LoadUseCase, LoadedConfig, BASE_CONFIG, OPT_CONF_KEYS_VAR};
pub use options::{CliOptions, OptionHolder};
