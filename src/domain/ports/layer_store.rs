//! LayerStore port - persistence of the command-line layer between installs

use std::path::{Path, PathBuf};

use crate::domain::entities::OverrideLayer;
use crate::domain::value_objects::TemplatingSection;
use crate::error::SuiteConfResult;

/// Relative path of the stored layer inside a run directory.
pub const STORED_LAYER_PATH: &str = "opt/rose-suite-cylc-install.conf";

pub trait LayerStore {
    /// The layer stored by the previous install, or an empty layer.
    fn load_previous_layer(&self, run_dir: &Path) -> SuiteConfResult<OverrideLayer>;

    /// Replace the stored layer in full. Returns the file written.
    fn store_layer(
        &self,
        run_dir: &Path,
        layer: &OverrideLayer,
        templating: TemplatingSection,
    ) -> SuiteConfResult<PathBuf>;

    /// Delete the stored layer. Returns whether one existed.
    fn clear(&self, run_dir: &Path) -> SuiteConfResult<bool>;
}

impl<T: LayerStore + ?Sized> LayerStore for &T {
    fn load_previous_layer(&self, run_dir: &Path) -> SuiteConfResult<OverrideLayer> {
        (**self).load_previous_layer(run_dir)
    }

    fn store_layer(
        &self,
        run_dir: &Path,
        layer: &OverrideLayer,
        templating: TemplatingSection,
    ) -> SuiteConfResult<PathBuf> {
        (**self).store_layer(run_dir, layer, templating)
    }

    fn clear(&self, run_dir: &Path) -> SuiteConfResult<bool> {
        (**self).clear(run_dir)
    }
}
