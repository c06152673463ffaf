use std::path::Path;

use anyhow::Result;

use suiteconf::Config;

use crate::cli::OverrideArgs;

pub fn cmd_env(
    overrides: &OverrideArgs,
    run_dir: Option<&Path>,
    cylc_version: Option<String>,
    resolved: bool,
    config: &Config,
    json: bool,
) -> Result<()> {
    let (_, projection) = super::load_projection(overrides, run_dir, cylc_version, config)?;

    if !resolved && !json {
        print!("{}", projection.render_shell());
        return Ok(());
    }

    let values = projection.resolved_env(&super::environ())?;
    if json {
        let map: serde_json::Map<String, serde_json::Value> = values
            .into_iter()
            .map(|(name, value)| (name, serde_json::Value::String(value)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else {
        for (name, value) in values {
            println!("{}={}", name, value);
        }
    }
    Ok(())
}
