//! Property tests for the literal reader.

use proptest::prelude::*;

use suiteconf::domain::services::{evaluate, parse_literal};
use suiteconf::TemplateValue;

fn template_value() -> impl Strategy<Value = TemplateValue> {
    let leaf = prop_oneof![
        Just(TemplateValue::None),
        any::<bool>().prop_map(TemplateValue::Bool),
        (-1_000_000_000_000i64..1_000_000_000_000i64).prop_map(TemplateValue::Int),
        (-1.0e6f64..1.0e6f64).prop_map(TemplateValue::Float),
        "\\PC{0,12}".prop_map(TemplateValue::Str),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(TemplateValue::List),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| TemplateValue::Map(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A rendered value reads back as the same value.
    #[test]
    fn property_rendered_value_reads_back(value in template_value()) {
        let rendered = value.to_string();
        let parsed = parse_literal(&rendered);
        prop_assert_eq!(parsed, Ok(value), "rendered: {}", rendered);
    }

    /// PROPERTY: Bare words never fail; they stay strings.
    #[test]
    fn property_bare_words_stay_strings(word in "[A-Za-z_/][A-Za-z0-9_/.-]{0,12}") {
        prop_assume!(!matches!(
            word.as_str(),
            "True" | "true" | "False" | "false" | "None" | "none"
        ));
        prop_assert_eq!(evaluate(&word), Ok(TemplateValue::Str(word.clone())));
    }

    /// PROPERTY: The reader never panics.
    #[test]
    fn property_reader_never_panics(text in "\\PC{0,40}") {
        let _ = parse_literal(&text);
        let _ = evaluate(&text);
    }
}
