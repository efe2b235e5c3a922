//! Property-based tests for the tag grammar
//!
//! Rendering a descriptor and parsing it back yields the same descriptor,
//! and every registry keyword classifies.

use formtag::forms::registry;
use formtag::tag::OPTION_KEYWORDS;
use formtag::{parse_tag, FieldDescriptor, RawOption};
use proptest::prelude::*;

fn keyword() -> impl Strategy<Value = String> {
    proptest::sample::select(registry::kinds().iter().map(|k| k.keyword).collect::<Vec<_>>())
        .prop_map(str::to_string)
}

fn option_key() -> impl Strategy<Value = String> {
    proptest::sample::select(OPTION_KEYWORDS.to_vec()).prop_map(str::to_string)
}

// Values free of the tag's own punctuation and of whitespace
fn option_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9,.#_-]{0,15}"
}

fn raw_option() -> impl Strategy<Value = RawOption> {
    prop_oneof![
        option_key().prop_map(RawOption::Flag),
        (option_key(), option_value()).prop_map(|(key, value)| RawOption::Pair { key, value }),
    ]
}

prop_compose! {
    fn descriptor()(
        field_type in keyword(),
        name in "[A-Za-z][A-Za-z0-9_]{0,11}",
        options in proptest::collection::vec(raw_option(), 0..5)
    ) -> FieldDescriptor {
        FieldDescriptor { field_type, name, options }
    }
}

proptest! {
    #[test]
    fn test_render_then_parse(descriptor in descriptor()) {
        let parsed = parse_tag(&descriptor.render()).unwrap();
        prop_assert_eq!(parsed, descriptor);
    }

    #[test]
    fn test_type_and_keys_are_case_insensitive(descriptor in descriptor()) {
        let shouted = descriptor.render().replacen(
            &descriptor.field_type,
            &descriptor.field_type.to_uppercase(),
            1,
        );
        let parsed = parse_tag(&shouted).unwrap();
        prop_assert_eq!(parsed.field_type, descriptor.field_type);
        prop_assert_eq!(parsed.name, descriptor.name);
    }

    #[test]
    fn test_parse_never_panics(raw in "\\{\\{[ -z|~]{0,40}\\}\\}") {
        let _ = parse_tag(&raw);
    }
}

#[test]
fn test_every_keyword_classifies() {
    for kind in registry::kinds() {
        let category = registry::classify(kind.keyword).unwrap();
        assert_eq!(category, kind.category);
        assert_eq!(registry::classify(&kind.keyword.to_uppercase()).unwrap(), category);
    }
    assert!(registry::classify("unknowntype").is_err());
}
