//! File-backed LayerStore
//!
//! Stores the command-line layer as `opt/rose-suite-cylc-install.conf` in
//! the run directory, in `rose-suite.conf` syntax.

use std::path::{Path, PathBuf};

use crate::domain::entities::{LayerOrigin, OverrideLayer};
use crate::domain::ports::{FileSystem, LayerStore, STORED_LAYER_PATH};
use crate::domain::value_objects::TemplatingSection;
use crate::error::SuiteConfResult;
use crate::infrastructure::conf::{dump_conf, load_conf};
use crate::infrastructure::fs::LocalFs;

/// Header comment of the stored layer file.
pub const STORED_LAYER_HEADER: &str = " This file records CLI Options.";

pub struct FileLayerStore<F: FileSystem = LocalFs> {
    fs: F,
}

impl FileLayerStore<LocalFs> {
    pub fn new() -> Self {
        Self { fs: LocalFs::new() }
    }
}

impl Default for FileLayerStore<LocalFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> FileLayerStore<F> {
    /// Create with a custom file system (for testing)
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    pub fn path(run_dir: &Path) -> PathBuf {
        run_dir.join(STORED_LAYER_PATH)
    }
}

impl<F: FileSystem> LayerStore for FileLayerStore<F> {
    fn load_previous_layer(&self, run_dir: &Path) -> SuiteConfResult<OverrideLayer> {
        let path = Self::path(run_dir);
        if !self.fs.exists(&path) {
            return Ok(OverrideLayer::empty(LayerOrigin::Persisted));
        }
        let node = load_conf(&self.fs, &path)?;
        let layer = OverrideLayer::from_node(LayerOrigin::Persisted, &node);
        tracing::debug!(path = %path.display(), assignments = layer.len(), "loaded stored layer");
        Ok(layer)
    }

    fn store_layer(
        &self,
        run_dir: &Path,
        layer: &OverrideLayer,
        templating: TemplatingSection,
    ) -> SuiteConfResult<PathBuf> {
        let path = Self::path(run_dir);
        let mut node = layer.to_node(templating);
        node.set_comments(vec![STORED_LAYER_HEADER.to_string()]);
        self.fs.write(&path, &dump_conf(&node))?;
        tracing::info!(path = %path.display(), "stored command line options");
        Ok(path)
    }

    fn clear(&self, run_dir: &Path) -> SuiteConfResult<bool> {
        let path = Self::path(run_dir);
        if !self.fs.exists(&path) {
            return Ok(false);
        }
        self.fs.remove(&path)?;
        tracing::info!(path = %path.display(), "cleared stored command line options");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Assignment, SectionTarget};
    use crate::domain::value_objects::IgnoreState;
    use crate::infrastructure::fs::MemoryFs;

    fn cli_layer() -> OverrideLayer {
        OverrideLayer::new(
            LayerOrigin::Cli,
            vec![
                Assignment::set(SectionTarget::Root, "opts", "foo", IgnoreState::Soft),
                Assignment::set(SectionTarget::section("env"), "A", "1", IgnoreState::Active),
                Assignment::set(SectionTarget::Templating, "X", "\"x\"", IgnoreState::Active),
            ],
        )
    }

    #[test]
    fn missing_file_gives_empty_layer() {
        let store = FileLayerStore::with_fs(MemoryFs::new());
        let layer = store.load_previous_layer(Path::new("/run")).unwrap();
        assert!(layer.is_empty());
        assert_eq!(layer.origin(), &LayerOrigin::Persisted);
    }

    #[test]
    fn store_writes_header_and_resolved_sections() {
        let store = FileLayerStore::with_fs(MemoryFs::new());
        let path = store
            .store_layer(Path::new("/run"), &cli_layer(), TemplatingSection::Jinja2)
            .unwrap();
        assert_eq!(path, Path::new("/run/opt/rose-suite-cylc-install.conf"));
        insta::assert_snapshot!(store.fs.read(&path).unwrap(), @r#"
        # This file records CLI Options.

        !opts=foo

        [env]
        A=1

        [jinja2:suite.rc]
        X="x"
        "#);
    }

    #[test]
    fn stored_layer_reloads_with_persisted_origin() {
        let store = FileLayerStore::with_fs(MemoryFs::new());
        store
            .store_layer(
                Path::new("/run"),
                &cli_layer(),
                TemplatingSection::TemplateVariables,
            )
            .unwrap();
        let layer = store.load_previous_layer(Path::new("/run")).unwrap();
        assert_eq!(layer.origin(), &LayerOrigin::Persisted);
        let node = layer.to_node(TemplatingSection::TemplateVariables);
        assert_eq!(node.get(&["env", "A"]).unwrap().text(), "1");
        assert_eq!(node.get(&["opts"]).unwrap().state(), IgnoreState::Soft);
        assert_eq!(
            node.get(&["template variables", "X"]).unwrap().text(),
            "\"x\""
        );
    }

    #[test]
    fn store_replaces_previous_content() {
        let store = FileLayerStore::with_fs(MemoryFs::new());
        let run = Path::new("/run");
        store
            .store_layer(run, &cli_layer(), TemplatingSection::TemplateVariables)
            .unwrap();
        let smaller = OverrideLayer::new(
            LayerOrigin::Cli,
            vec![Assignment::set(
                SectionTarget::section("env"),
                "B",
                "2",
                IgnoreState::Active,
            )],
        );
        store
            .store_layer(run, &smaller, TemplatingSection::TemplateVariables)
            .unwrap();
        let node = store
            .load_previous_layer(run)
            .unwrap()
            .to_node(TemplatingSection::TemplateVariables);
        assert!(node.get(&["env", "A"]).is_none());
        assert!(node.get(&["env", "B"]).is_some());
    }

    #[test]
    fn clear_reports_whether_file_existed() {
        let store = FileLayerStore::with_fs(MemoryFs::new());
        let run = Path::new("/run");
        assert!(!store.clear(run).unwrap());
        store
            .store_layer(run, &cli_layer(), TemplatingSection::TemplateVariables)
            .unwrap();
        assert!(store.clear(run).unwrap());
        assert!(store.load_previous_layer(run).unwrap().is_empty());
    }
}
