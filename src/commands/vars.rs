use std::path::Path;

use anyhow::Result;

use suiteconf::{Config, TemplateValue};

use crate::cli::OverrideArgs;

pub fn cmd_vars(
    overrides: &OverrideArgs,
    run_dir: Option<&Path>,
    cylc_version: Option<String>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let (_, projection) = super::load_projection(overrides, run_dir, cylc_version, config)?;

    if json {
        let output = serde_json::json!({
            "templating": projection.templating.section_name(),
            "engine": projection.templating.engine(),
            "variables": TemplateValue::Map(projection.template_variables.clone()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (name, value) in &projection.template_variables {
        println!("{}={}", name, value);
    }
    Ok(())
}
