//! Command implementations for the `suiteconf` binary

mod env;
mod install;
mod show;
mod vars;

pub use env::cmd_env;
pub use install::cmd_install;
pub use show::cmd_show;
pub use vars::cmd_vars;

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use suiteconf::application::{CliOptions, LoadOptions, LoadUseCase, LoadedConfig};
use suiteconf::domain::services::{
    apply_standard_variables, project, Projection, ProjectionContext,
};
use suiteconf::infrastructure::{FileLayerStore, LocalFs};
use suiteconf::Config;

use crate::cli::OverrideArgs;

impl OverrideArgs {
    pub fn cli_options(&self) -> CliOptions {
        CliOptions {
            defines: self.defines.clone(),
            template_defines: self.template_defines.clone(),
            opt_conf_keys: self.opt_conf_keys.clone(),
            clear_install_options: false,
        }
    }
}

pub(crate) fn environ() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// `--cylc-version`, falling back to `$CYLC_VERSION`.
pub(crate) fn cylc_version(
    flag: Option<String>,
    environ: &HashMap<String, String>,
) -> Option<String> {
    flag.or_else(|| environ.get("CYLC_VERSION").cloned())
        .filter(|v| !v.is_empty())
}

pub(crate) fn load(
    overrides: &OverrideArgs,
    run_dir: Option<&Path>,
    environ: &HashMap<String, String>,
) -> Result<LoadedConfig> {
    let mut request = LoadOptions::new(&overrides.source).with_environ(environ.clone());
    if let Some(run_dir) = run_dir {
        request = request.with_run_dir(run_dir);
    }
    let use_case = LoadUseCase::new(FileLayerStore::new(), LocalFs::new());
    use_case
        .execute(&request, &overrides.cli_options())
        .with_context(|| format!("failed to load config from {}", overrides.source.display()))
}

/// Merge, add the standard variables, and project.
pub(crate) fn load_projection(
    overrides: &OverrideArgs,
    run_dir: Option<&Path>,
    cylc_version_flag: Option<String>,
    config: &Config,
) -> Result<(LoadedConfig, Projection)> {
    let environ = environ();
    let mut loaded = load(overrides, run_dir, &environ)?;
    let context = ProjectionContext::detect(
        config.site().map(str::to_string),
        cylc_version(cylc_version_flag, &environ),
    );
    apply_standard_variables(&mut loaded.tree, loaded.templating, &context);
    let projection = project(&loaded.tree, loaded.templating, &environ)?;
    Ok((loaded, projection))
}
