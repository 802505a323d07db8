//! Property tests for the error hierarchy and message storage.

use proptest::prelude::*;

use strongbox_core::errors::active::truncate_message;
use strongbox_core::errors::*;
use strongbox_core::throw;

/// Build a chain of `len` types, root first, each extending the previous one.
fn hierarchy(len: usize) -> Vec<&'static ErrorType> {
    let root: &'static ErrorType = Box::leak(Box::new(ErrorType::root(1000, "ChainError0")));
    let mut chain = vec![root];

    for level in 1..len {
        let name: &'static str = Box::leak(format!("ChainError{level}").into_boxed_str());
        let parent = chain[level - 1];
        chain.push(Box::leak(Box::new(ErrorType::new(
            1000 + level as i32,
            name,
            false,
            parent,
        ))));
    }

    chain
}

proptest! {
    #[test]
    fn extends_holds_exactly_for_ancestors(len in 1usize..12, i in 0usize..12, j in 0usize..12) {
        let chain = hierarchy(len);
        let (i, j) = (i % len, j % len);

        let expected = j < i || (i == 0 && j == 0);
        prop_assert_eq!(extends(chain[i], chain[j]), expected);
        prop_assert_eq!(chain[i].is_a(chain[j]), j <= i);
    }

    #[test]
    fn every_registered_type_extends_the_root(index in 0usize..64) {
        let error_type = ERROR_TYPES[index % ERROR_TYPES.len()];

        prop_assert!(extends(error_type, &RUNTIME_ERROR));
        prop_assert!(!error_type.is_root() || std::ptr::eq(error_type, &RUNTIME_ERROR));
    }

    #[test]
    fn truncation_keeps_a_bounded_prefix(text in "\\PC{0,80}", capacity in 1usize..64) {
        let stored = truncate_message(&text, capacity);

        prop_assert!(text.starts_with(&stored));
        prop_assert_eq!(
            stored.chars().count(),
            text.chars().count().min(capacity - 1)
        );
    }

    #[test]
    fn thrown_messages_are_stored_truncated(text in "[a-z ]{0,64}", capacity in 2usize..48) {
        reconfigure_thread(ErrorSettings {
            message_capacity: capacity,
            ..ErrorSettings::default()
        });

        let stored = region(|| -> String { throw!(FORMAT_ERROR, "{text}") })
            .catch_any(|error| error.message().to_owned())
            .run();

        prop_assert_eq!(stored, truncate_message(&text, capacity));
        prop_assert_eq!(try_depth(), 0);
    }
}
