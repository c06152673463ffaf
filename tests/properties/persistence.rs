//! Property tests for the stored command-line layer.

use std::path::Path;

use proptest::prelude::*;

use suiteconf::domain::entities::{Assignment, LayerOrigin, OverrideLayer, SectionTarget};
use suiteconf::domain::ports::LayerStore;
use suiteconf::domain::value_objects::IgnoreState;
use suiteconf::infrastructure::conf::dump_conf;
use suiteconf::infrastructure::{FileLayerStore, MemoryFs};
use suiteconf::TemplatingSection;

fn state() -> impl Strategy<Value = IgnoreState> {
    prop_oneof![
        Just(IgnoreState::Active),
        Just(IgnoreState::Soft),
        Just(IgnoreState::Hard),
    ]
}

fn assignment() -> impl Strategy<Value = Assignment> {
    (
        any::<bool>(),
        "[A-Z][A-Z0-9_]{0,5}",
        "[a-z0-9/.]{1,6}",
        state(),
    )
        .prop_map(|(templating, key, value, state)| {
            let target = if templating {
                SectionTarget::Templating
            } else {
                SectionTarget::section("env")
            };
            Assignment::set(target, key, value, state)
        })
}

fn templating() -> impl Strategy<Value = TemplatingSection> {
    prop_oneof![
        Just(TemplatingSection::TemplateVariables),
        Just(TemplatingSection::Jinja2),
        Just(TemplatingSection::Empy),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A stored layer loads back to the same config.
    #[test]
    fn property_stored_layer_reads_back(
        assignments in prop::collection::vec(assignment(), 0..8),
        templating in templating(),
    ) {
        let fs = MemoryFs::new();
        let store = FileLayerStore::with_fs(&fs);
        let run_dir = Path::new("/run");
        let layer = OverrideLayer::new(LayerOrigin::Cli, assignments);

        store.store_layer(run_dir, &layer, templating).unwrap();
        let loaded = store.load_previous_layer(run_dir).unwrap();

        prop_assert_eq!(loaded.origin(), &LayerOrigin::Persisted);
        prop_assert_eq!(
            dump_conf(&loaded.to_node(templating)),
            dump_conf(&layer.to_node(templating))
        );
    }

    /// PROPERTY: Storing replaces the previous layer in full.
    #[test]
    fn property_store_replaces(
        first in prop::collection::vec(assignment(), 1..5),
        second in prop::collection::vec(assignment(), 0..5),
    ) {
        let fs = MemoryFs::new();
        let store = FileLayerStore::with_fs(&fs);
        let run_dir = Path::new("/run");
        let templating = TemplatingSection::TemplateVariables;

        store
            .store_layer(run_dir, &OverrideLayer::new(LayerOrigin::Cli, first), templating)
            .unwrap();
        let second = OverrideLayer::new(LayerOrigin::Cli, second);
        store.store_layer(run_dir, &second, templating).unwrap();

        let loaded = store.load_previous_layer(run_dir).unwrap();
        prop_assert_eq!(
            dump_conf(&loaded.to_node(templating)),
            dump_conf(&second.to_node(templating))
        );
    }
}
