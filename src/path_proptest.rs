//! Property-based tests for tree path functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{base_name, depth, join, normalize, parent, strip_dir};
    use proptest::prelude::*;

    proptest! {
        /// Property: normalize is idempotent
        #[test]
        fn normalize_is_idempotent(input in "[a-z./\\\\]{0,24}") {
            let once = normalize(&input);
            let twice = normalize(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: backslashes survive normalization as name characters
        #[test]
        fn normalize_keeps_backslashes(segments in prop::collection::vec("[a-z\\\\]{1,6}", 1..5)) {
            let path = segments.join("/");
            prop_assert_eq!(normalize(&path), path);
        }

        /// Property: normalized paths never carry separators at the edges or
        /// empty, `.` or `..` components
        #[test]
        fn normalize_produces_clean_components(input in "[a-z./]{0,24}") {
            let result = normalize(&input);
            prop_assert!(!result.starts_with('/'));
            prop_assert!(!result.ends_with('/'));
            for part in result.split('/').filter(|_| !result.is_empty()) {
                prop_assert!(!part.is_empty());
                prop_assert!(part != "." && part != "..");
            }
        }

        /// Property: parent and base name join back to the original path
        #[test]
        fn parent_and_base_name_rejoin(segments in prop::collection::vec("[a-z]{1,6}", 1..5)) {
            let path = segments.join("/");
            prop_assert_eq!(join(parent(&path), base_name(&path)), path.clone());
            prop_assert_eq!(depth(&path), segments.len());
        }

        /// Property: a joined path always strips back to its child part
        #[test]
        fn strip_dir_inverts_join(
            dir in prop::collection::vec("[a-z]{1,6}", 0..3),
            name in prop::collection::vec("[a-z]{1,6}", 1..3),
        ) {
            let dir = dir.join("/");
            let name = name.join("/");
            let joined = join(&dir, &name);
            prop_assert_eq!(strip_dir(&joined, &dir), Some(name.as_str()));
        }
    }
}
