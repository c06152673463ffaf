//! Install Use Case
//!
//! Runs after a workflow has been copied to its run directory:
//! 1. Merge the config with the pending command-line options
//! 2. Project it, so bad template values fail before anything is written
//! 3. Store the accumulated command-line layer and mark the options consumed
//! 4. Dump the resolved config under `log/conf/`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::application::load::{
    layer_opts, without_opts, LoadOptions, LoadUseCase, LoadedConfig, OPT_CONF_KEYS_VAR,
};
use crate::application::options::{CliOptions, OptionHolder};
use crate::domain::entities::{Assignment, LayerOrigin, OverrideLayer, SectionTarget};
use crate::domain::ports::{FileSystem, LayerStore};
use crate::domain::services::{
    apply_standard_variables, parse_opt_conf_keys, project, simplify_opts, Projection,
    ProjectionContext, ORIG_HOST_MARKER, ROSE_ORIG_HOST,
};
use crate::domain::value_objects::{IgnoreState, TemplateValue, ENV_SECTION, OPTS_KEY};
use crate::error::SuiteConfResult;
use crate::infrastructure::conf::dump_conf;

/// Result of an install
#[derive(Debug, Clone, PartialEq)]
pub struct InstallResult {
    /// Stored layer file, `None` when the workflow has no `rose-suite.conf`
    pub stored_layer: Option<PathBuf>,
    /// Resolved config dump, when enabled
    pub log_dump: Option<PathBuf>,
    /// Merged config the workflow will see
    pub config: LoadedConfig,
    pub projection: Projection,
}

pub struct InstallUseCase<LS, FS>
where
    LS: LayerStore,
    FS: FileSystem,
{
    layer_store: LS,
    file_system: FS,
    context: ProjectionContext,
    log_dump: bool,
}

impl<LS, FS> InstallUseCase<LS, FS>
where
    LS: LayerStore,
    FS: FileSystem,
{
    pub fn new(layer_store: LS, file_system: FS, context: ProjectionContext) -> Self {
        Self {
            layer_store,
            file_system,
            context,
            log_dump: true,
        }
    }

    pub fn with_log_dump(mut self, log_dump: bool) -> Self {
        self.log_dump = log_dump;
        self
    }

    /// Install `source` into `run_dir` with the options in `holder`,
    /// consuming them once stored.
    pub fn execute(
        &self,
        source: &Path,
        run_dir: &Path,
        environ: &HashMap<String, String>,
        holder: &mut OptionHolder,
    ) -> SuiteConfResult<InstallResult> {
        let request = LoadOptions::new(source)
            .with_run_dir(run_dir)
            .with_environ(environ.clone());
        let loader = LoadUseCase::new(&self.layer_store, &self.file_system);

        let loaded = loader.execute(&request, holder.options())?;
        if !loaded.has_base {
            tracing::info!(
                dir = %source.display(),
                "no rose-suite.conf, nothing to record"
            );
            let projection = project(&loaded.tree, loaded.templating, environ)?;
            return Ok(InstallResult {
                stored_layer: None,
                log_dump: None,
                config: loaded,
                projection,
            });
        }

        let mut tree = loaded.tree.clone();
        apply_standard_variables(&mut tree, loaded.templating, &self.context);
        let projection = project(&tree, loaded.templating, environ)?;

        let stored_layer = holder.consume_with(|cli| {
            if cli.clear_install_options && self.layer_store.clear(run_dir)? {
                tracing::info!("previous install options cleared");
            }
            let record = self.install_record(&loaded, cli, environ)?;
            self.layer_store
                .store_layer(run_dir, &record, loaded.templating)
        })?;

        let log_dump = if self.log_dump {
            let name = format!("{}-rose-suite.conf", Utc::now().format("%Y%m%dT%H%M%SZ"));
            let path = run_dir.join("log").join("conf").join(name);
            self.file_system.write(&path, &dump_conf(&tree))?;
            tracing::debug!(path = %path.display(), "wrote config log");
            Some(path)
        } else {
            None
        };

        Ok(InstallResult {
            stored_layer: Some(stored_layer),
            log_dump,
            config: LoadedConfig { tree, ..loaded },
            projection,
        })
    }

    /// The layer to store: the previous record with this install's
    /// command-line options merged over it.
    fn install_record(
        &self,
        loaded: &LoadedConfig,
        cli: &CliOptions,
        environ: &HashMap<String, String>,
    ) -> SuiteConfResult<OverrideLayer> {
        let mut opts = layer_opts(&loaded.previous_layer, true)?;
        opts.extend(layer_opts(&loaded.cli_layer, false)?);
        if let Some(env_keys) = environ.get(OPT_CONF_KEYS_VAR) {
            opts.extend(parse_opt_conf_keys(env_keys)?);
        }
        for key in &cli.opt_conf_keys {
            opts.extend(parse_opt_conf_keys(key)?);
        }
        let opts: Vec<String> = simplify_opts(opts).iter().map(ToString::to_string).collect();

        let header = OverrideLayer::new(
            LayerOrigin::Cli,
            vec![Assignment::set(
                SectionTarget::Root,
                OPTS_KEY,
                opts.join(" "),
                IgnoreState::Soft,
            )],
        );
        let mut record = header
            .followed_by(&without_opts(&loaded.previous_layer))
            .followed_by(&without_opts(&loaded.cli_layer));

        let templating_name = loaded.templating.section_name();
        let recorded = record.to_node(loaded.templating);
        if let Some(host) = &self.context.orig_host {
            let mut pins = Vec::new();
            if recorded.get(&[ENV_SECTION, ROSE_ORIG_HOST]).is_none() {
                pins.push(
                    Assignment::set(
                        SectionTarget::section(ENV_SECTION),
                        ROSE_ORIG_HOST,
                        host.as_str(),
                        IgnoreState::Active,
                    )
                    .with_comments(vec![ORIG_HOST_MARKER.to_string()]),
                );
            }
            if recorded.get(&[templating_name, ROSE_ORIG_HOST]).is_none() {
                pins.push(
                    Assignment::set(
                        SectionTarget::section(templating_name),
                        ROSE_ORIG_HOST,
                        TemplateValue::Str(host.clone()),
                        IgnoreState::Active,
                    )
                    .with_comments(vec![ORIG_HOST_MARKER.to_string()]),
                );
            }
            record = record.followed_by(&OverrideLayer::new(LayerOrigin::Cli, pins));
        }
        Ok(record)
    }
}
