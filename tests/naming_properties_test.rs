use proptest::prelude::*;
use pub2pdf::core::naming::{identifier_for, normalize, FALLBACK_IDENTIFIER};

proptest! {
    #[test]
    fn normalized_names_are_ascii_alphanumeric(stem in ".*") {
        let id = normalize(&stem);
        prop_assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn normalized_names_never_start_uppercase(stem in ".*") {
        let id = normalize(&stem);
        if let Some(first) = id.chars().next() {
            prop_assert!(!first.is_ascii_uppercase());
        }
    }

    #[test]
    fn lowercase_words_pass_through(stem in "[a-z][a-z0-9]{0,20}") {
        prop_assert_eq!(normalize(&stem), stem);
    }

    #[test]
    fn identifiers_are_never_empty(stem in ".*") {
        prop_assert!(!identifier_for(&stem, FALLBACK_IDENTIFIER).is_empty());
    }

    #[test]
    fn word_boundaries_do_not_depend_on_separator(words in prop::collection::vec("[a-z]{1,8}", 1..5)) {
        prop_assert_eq!(normalize(&words.join(" ")), normalize(&words.join("__")));
    }
}
