use std::path::Path;

use anyhow::Result;

use suiteconf::infrastructure::conf::dump_conf;

use crate::cli::OverrideArgs;

pub fn cmd_show(overrides: &OverrideArgs, run_dir: Option<&Path>, json: bool) -> Result<()> {
    let loaded = super::load(overrides, run_dir, &super::environ())?;

    if json {
        let overridden: Vec<serde_json::Value> = loaded
            .overrides
            .iter()
            .map(|o| {
                serde_json::json!({
                    "path": o.path,
                    "from": o.from_layer,
                    "by": o.by_layer,
                })
            })
            .collect();
        let output = serde_json::json!({
            "templating": loaded.templating.section_name(),
            "opts": loaded.opt_conf_keys,
            "overrides": overridden,
            "config": dump_conf(&loaded.tree),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for o in &loaded.overrides {
        tracing::info!(path = %o.path, from = %o.from_layer, by = %o.by_layer, "overridden");
    }
    print!("{}", dump_conf(&loaded.tree));
    Ok(())
}
