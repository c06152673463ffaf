//! Load Use Case
//!
//! Builds the merge for one workflow:
//! 1. Read `rose-suite.conf`
//! 2. Parse the command-line layer
//! 3. Load the layer stored by a previous install
//! 4. Resolve the optional config list and load each one
//! 5. Merge everything in precedence order

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::application::options::CliOptions;
use crate::domain::entities::{
    AssignmentValue, ConfigNode, LayerOrigin, OverrideLayer, SectionTarget,
};
use crate::domain::ports::{FileSystem, LayerStore};
use crate::domain::services::{
    environment_layer, merge, parse_opt_conf_keys, simplify_opts, MergeResult, MergeSpec,
    OptConfKey, OverrideInfo, OverrideParser,
};
use crate::domain::value_objects::{IgnoreState, TemplatingSection, OPTS_KEY};
use crate::error::{SuiteConfError, SuiteConfResult};
use crate::infrastructure::conf::load_conf;
use crate::infrastructure::repositories::OptConfRepository;

pub const BASE_CONFIG: &str = "rose-suite.conf";

/// Environment variable listing extra optional configs.
pub const OPT_CONF_KEYS_VAR: &str = "ROSE_SUITE_OPT_CONF_KEYS";

/// Where to load from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Workflow source directory holding `rose-suite.conf`
    pub source: PathBuf,
    /// Installed run directory, if the workflow has been installed
    pub run_dir: Option<PathBuf>,
    /// Process environment snapshot
    pub environ: HashMap<String, String>,
}

impl LoadOptions {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_run_dir(mut self, run_dir: impl Into<PathBuf>) -> Self {
        self.run_dir = Some(run_dir.into());
        self
    }

    pub fn with_environ(mut self, environ: HashMap<String, String>) -> Self {
        self.environ = environ;
        self
    }
}

/// A merged workflow config.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub tree: ConfigNode,
    pub templating: TemplatingSection,
    pub overrides: Vec<OverrideInfo>,
    /// Resolved optional config names, lowest priority first
    pub opt_conf_keys: Vec<String>,
    /// Command-line layer with `-S` pinned to the active templating section
    pub cli_layer: OverrideLayer,
    /// Layer from the previous install (empty if none or cleared)
    pub previous_layer: OverrideLayer,
    /// `rose-suite.conf` exists
    pub has_base: bool,
}

pub struct LoadUseCase<LS, FS>
where
    LS: LayerStore,
    FS: FileSystem,
{
    layer_store: LS,
    file_system: FS,
}

impl<LS, FS> LoadUseCase<LS, FS>
where
    LS: LayerStore,
    FS: FileSystem,
{
    pub fn new(layer_store: LS, file_system: FS) -> Self {
        Self {
            layer_store,
            file_system,
        }
    }

    /// Load and merge the workflow config with `cli` applied on top.
    pub fn execute(&self, request: &LoadOptions, cli: &CliOptions) -> SuiteConfResult<LoadedConfig> {
        let base_path = request.source.join(BASE_CONFIG);
        let env_keys = match request.environ.get(OPT_CONF_KEYS_VAR) {
            Some(text) => parse_opt_conf_keys(text)?,
            None => Vec::new(),
        };

        if !self.file_system.exists(&base_path) {
            if !cli.is_empty() || !env_keys.is_empty() {
                return Err(SuiteConfError::MissingBaseConfig {
                    dir: request.source.clone(),
                });
            }
            tracing::debug!(dir = %request.source.display(), "no rose-suite.conf");
            return Ok(LoadedConfig {
                tree: ConfigNode::new(),
                templating: TemplatingSection::default(),
                overrides: Vec::new(),
                opt_conf_keys: Vec::new(),
                cli_layer: OverrideLayer::empty(LayerOrigin::Cli),
                previous_layer: OverrideLayer::empty(LayerOrigin::Persisted),
                has_base: false,
            });
        }

        let base = load_conf(&self.file_system, &base_path)?;
        let cli_layer = OverrideParser::new().parse_layer(
            LayerOrigin::Cli,
            &cli.defines,
            &cli.template_defines,
        )?;
        let previous_layer = self.previous_layer(request.run_dir.as_deref(), cli)?;

        let mut tokens: Vec<OptConfKey> = Vec::new();
        if let Some(leaf) = base.leaf(OPTS_KEY).filter(|leaf| !leaf.is_ignored()) {
            tokens.extend(parse_opt_conf_keys(&leaf.text())?);
        }
        tokens.extend(layer_opts(&previous_layer, true)?);
        tokens.extend(layer_opts(&cli_layer, false)?);
        tokens.extend(env_keys);
        for key in &cli.opt_conf_keys {
            tokens.extend(parse_opt_conf_keys(key)?);
        }
        let keys = simplify_opts(tokens);
        let opt_conf_keys: Vec<String> = keys.iter().map(ToString::to_string).collect();

        let opt_repo = OptConfRepository::with_fs(&self.file_system, &request.source);
        let opt_layers = opt_repo.load_all(&keys)?;

        let mut spec = MergeSpec::new(base.clone())
            .with_layer(environment_layer(&base, |key| {
                request.environ.get(key).cloned()
            }))
            .with_layer(without_opts(&previous_layer));
        for layer in opt_layers {
            spec.push(layer);
        }
        spec.push(without_opts(&cli_layer));

        let MergeResult {
            mut tree,
            templating,
            overrides,
        } = merge(&spec)?;

        if !opt_conf_keys.is_empty() {
            tree.set(&[OPTS_KEY], opt_conf_keys.join(" "), IgnoreState::Active);
        }
        for info in &overrides {
            tracing::debug!(
                path = %info.path,
                from = %info.from_layer,
                by = %info.by_layer,
                "value overridden"
            );
        }

        Ok(LoadedConfig {
            tree,
            templating,
            overrides,
            opt_conf_keys,
            cli_layer: cli_layer.resolve_templating(templating),
            previous_layer,
            has_base: true,
        })
    }

    fn previous_layer(
        &self,
        run_dir: Option<&Path>,
        cli: &CliOptions,
    ) -> SuiteConfResult<OverrideLayer> {
        match run_dir {
            Some(run_dir) if !cli.clear_install_options => {
                self.layer_store.load_previous_layer(run_dir)
            }
            _ => Ok(OverrideLayer::empty(LayerOrigin::Persisted)),
        }
    }
}

fn is_opts(target: &SectionTarget, key: &str) -> bool {
    *target == SectionTarget::Root && key == OPTS_KEY
}

/// Opt names set by a layer's root `opts` assignments.
///
/// The stored layer records them as `!opts=`, so ignored values count there.
pub(crate) fn layer_opts(
    layer: &OverrideLayer,
    include_ignored: bool,
) -> SuiteConfResult<Vec<OptConfKey>> {
    let mut out = Vec::new();
    for assignment in layer.assignments() {
        if !is_opts(&assignment.target, &assignment.key) {
            continue;
        }
        match &assignment.value {
            AssignmentValue::Set { value, state } if include_ignored || !state.is_ignored() => {
                out.extend(parse_opt_conf_keys(&value.text())?);
            }
            AssignmentValue::Delete => out.clear(),
            _ => {}
        }
    }
    Ok(out)
}

pub(crate) fn without_opts(layer: &OverrideLayer) -> OverrideLayer {
    layer.filtered(|a| !is_opts(&a.target, &a.key))
}

#[cfg(test)]
mod tests;
