//! Property tests for optional config list handling.

use proptest::prelude::*;

use suiteconf::domain::services::{shell_split, simplify_opts, OptConfKey};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Simplified lists keep each name once, at its last position.
    #[test]
    fn property_simplify_keeps_last_occurrence(
        names in prop::collection::vec("[a-d]", 0..12),
    ) {
        let simplified = simplify_opts(names.clone());

        let mut sorted = simplified.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), simplified.len(), "duplicates in {:?}", simplified);

        for name in &names {
            prop_assert!(simplified.contains(name));
        }

        let last_index = |name: &String| names.iter().rposition(|n| n == name).unwrap();
        for pair in simplified.windows(2) {
            prop_assert!(last_index(&pair[0]) < last_index(&pair[1]));
        }
    }

    /// PROPERTY: Simplifying twice changes nothing.
    #[test]
    fn property_simplify_is_idempotent(names in prop::collection::vec("[a-z]{1,3}", 0..10)) {
        let once = simplify_opts(names);
        let twice = simplify_opts(once.clone());
        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: Space-joined names split back into the same names.
    #[test]
    fn property_shell_split_round_trips(names in prop::collection::vec("[A-Za-z0-9_()-]{1,8}", 0..8)) {
        let joined = names.join("  ");
        prop_assert_eq!(shell_split(&joined), names);
    }

    /// PROPERTY: A parenthesised name is the optional form of the same name.
    #[test]
    fn property_parenthesised_names_are_optional(name in "[A-Za-z0-9_][A-Za-z0-9_.+-]{0,10}") {
        let plain = OptConfKey::parse(&name).unwrap();
        let optional = OptConfKey::parse(&format!("({})", name)).unwrap();
        prop_assert!(!plain.is_optional());
        prop_assert!(optional.is_optional());
        prop_assert_eq!(plain.name(), optional.name());
        prop_assert_eq!(optional.to_string(), format!("({})", name));
    }
}
