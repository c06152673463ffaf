//! Optional config lookup
//!
//! Optional configs live next to `rose-suite.conf` as
//! `opt/rose-suite-<name>.conf`.

use std::path::{Path, PathBuf};

use crate::domain::entities::{LayerOrigin, OverrideLayer};
use crate::domain::ports::FileSystem;
use crate::domain::services::OptConfKey;
use crate::error::{SuiteConfError, SuiteConfResult};
use crate::infrastructure::conf::load_conf;
use crate::infrastructure::fs::LocalFs;

pub struct OptConfRepository<F: FileSystem = LocalFs> {
    fs: F,
    source_dir: PathBuf,
}

impl OptConfRepository<LocalFs> {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self::with_fs(LocalFs::new(), source_dir)
    }
}

impl<F: FileSystem> OptConfRepository<F> {
    pub fn with_fs(fs: F, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            source_dir: source_dir.into(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.source_dir
            .join("opt")
            .join(format!("rose-suite-{}.conf", name))
    }

    /// Load the layer for `key`.
    ///
    /// A missing `(name)` config is skipped with a warning; a missing plain
    /// name is an error.
    pub fn load(&self, key: &OptConfKey) -> SuiteConfResult<Option<OverrideLayer>> {
        let path = self.path(key.name());
        if !self.fs.exists(&path) {
            if key.is_optional() {
                tracing::warn!(
                    name = key.name(),
                    path = %path.display(),
                    "optional config not found, skipping"
                );
                return Ok(None);
            }
            return Err(SuiteConfError::UnknownOptionalConfig {
                name: key.name().to_string(),
                path,
            });
        }
        let node = load_conf(&self.fs, &path)?;
        Ok(Some(OverrideLayer::from_node(
            LayerOrigin::OptionalConfig(key.name().to_string()),
            &node,
        )))
    }

    /// Load every key in order, skipping missing optional ones.
    pub fn load_all(&self, keys: &[OptConfKey]) -> SuiteConfResult<Vec<OverrideLayer>> {
        let mut layers = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(layer) = self.load(key)? {
                layers.push(layer);
            }
        }
        Ok(layers)
    }
}
