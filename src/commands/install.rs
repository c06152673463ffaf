use std::path::Path;

use anyhow::{Context, Result};

use suiteconf::application::{InstallUseCase, OptionHolder};
use suiteconf::domain::services::ProjectionContext;
use suiteconf::infrastructure::{FileLayerStore, LocalFs};
use suiteconf::Config;

use crate::cli::OverrideArgs;

pub fn cmd_install(
    overrides: &OverrideArgs,
    run_dir: &Path,
    cylc_version: Option<String>,
    clear_install_options: bool,
    no_log_dump: bool,
    config: &Config,
    json: bool,
) -> Result<()> {
    let environ = super::environ();
    let context = ProjectionContext::detect(
        config.site().map(str::to_string),
        super::cylc_version(cylc_version, &environ),
    );

    let mut holder = OptionHolder::new(
        overrides
            .cli_options()
            .with_clear_install_options(clear_install_options),
    );
    let use_case = InstallUseCase::new(FileLayerStore::new(), LocalFs::new(), context)
        .with_log_dump(config.install.log_dump && !no_log_dump);
    let result = use_case
        .execute(&overrides.source, run_dir, &environ, &mut holder)
        .with_context(|| format!("failed to install into {}", run_dir.display()))?;

    if json {
        let output = serde_json::json!({
            "stored_layer": result.stored_layer,
            "log_dump": result.log_dump,
            "opts": result.config.opt_conf_keys,
            "templating": result.projection.templating.section_name(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match &result.stored_layer {
        Some(path) => println!("Recorded options in {}", path.display()),
        None => println!("No rose-suite.conf in {}; nothing recorded", overrides.source.display()),
    }
    if let Some(path) = &result.log_dump {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
