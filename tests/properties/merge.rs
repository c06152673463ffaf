//! Property tests for the layered merge.

use proptest::prelude::*;

use suiteconf::domain::entities::{Assignment, ConfigNode, LayerOrigin, OverrideLayer, SectionTarget};
use suiteconf::domain::services::{merge, MergeSpec};
use suiteconf::domain::value_objects::IgnoreState;

const KEYS: [&str; 4] = ["A", "B", "C", "D"];

fn origin(idx: u8) -> LayerOrigin {
    match idx {
        0 => LayerOrigin::Environment,
        1 => LayerOrigin::Persisted,
        2 => LayerOrigin::OptionalConfig("opt".to_string()),
        _ => LayerOrigin::Cli,
    }
}

fn layer_strategy() -> impl Strategy<Value = (u8, Vec<(usize, String)>)> {
    (
        0u8..4,
        prop::collection::vec((0..KEYS.len(), "[a-z0-9]{1,4}"), 0..5),
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Each key ends up with the value from the highest-precedence
    /// layer that sets it; ties go to the layer added last.
    #[test]
    fn property_later_layers_win(
        base_values in prop::collection::vec("[a-z]{1,4}", KEYS.len()),
        layers in prop::collection::vec(layer_strategy(), 0..6),
    ) {
        let mut base = ConfigNode::new();
        for (key, value) in KEYS.iter().zip(&base_values) {
            base.set(&["env", *key], value.as_str(), IgnoreState::Active);
        }

        let mut spec = MergeSpec::new(base);
        for (origin_idx, sets) in &layers {
            let assignments = sets
                .iter()
                .map(|(k, v)| {
                    Assignment::set(SectionTarget::section("env"), KEYS[*k], v.as_str(), IgnoreState::Active)
                })
                .collect();
            spec.push(OverrideLayer::new(origin(*origin_idx), assignments));
        }

        let result = merge(&spec).unwrap();

        for (idx, key) in KEYS.iter().enumerate() {
            let mut expected = (0u8, 0usize, base_values[idx].clone());
            for (order, (origin_idx, sets)) in layers.iter().enumerate() {
                for (k, v) in sets {
                    if *k == idx && (*origin_idx + 1, order) >= (expected.0, expected.1) {
                        expected = (*origin_idx + 1, order, v.clone());
                    }
                }
            }
            let actual = result.tree.get(&["env", *key]).unwrap().text().into_owned();
            prop_assert_eq!(actual, expected.2, "key {}", key);
        }
    }

    /// PROPERTY: Merging does not modify the base tree.
    #[test]
    fn property_merge_leaves_base_untouched(
        values in prop::collection::vec("[a-z]{1,4}", 1..4),
    ) {
        let mut base = ConfigNode::new();
        base.set(&["env", "A"], "base", IgnoreState::Active);
        let before = base.clone();

        let assignments = values
            .iter()
            .map(|v| Assignment::set(SectionTarget::section("env"), "A", v.as_str(), IgnoreState::Active))
            .collect();
        let spec = MergeSpec::new(base).with_layer(OverrideLayer::new(LayerOrigin::Cli, assignments));
        let result = merge(&spec).unwrap();

        prop_assert_eq!(spec.base(), &before);
        prop_assert_eq!(
            result.tree.get(&["env", "A"]).unwrap().text().into_owned(),
            values.last().unwrap().clone()
        );
    }
}
