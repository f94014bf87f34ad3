//! Property-based tests for path arithmetic and coordinate parsing.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(all(test, unix))]
mod proptest_tests {
    use std::path::Path;

    use crate::coordinate::FragmentReference;
    use crate::error::Error;
    use crate::path::relativize;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[a-z0-9_.-]{1,8}".prop_filter("no dot segments", |s| s != "." && s != "..")
    }

    fn absolute(segments: &[String]) -> String {
        format!("/{}", segments.join("/"))
    }

    // ============================================================================
    // relativize property tests
    // ============================================================================

    proptest! {
        /// Property: joining the anchor with the relative path and normalizing
        /// `..` steps yields the target again
        #[test]
        fn relativize_resolves_back_to_target(
            target in prop::collection::vec(segment(), 1..6),
            anchor in prop::collection::vec(segment(), 1..6),
        ) {
            let target_path = absolute(&target);
            let anchor_path = absolute(&anchor);
            let relative = relativize(&target_path, &anchor_path);

            let mut resolved: Vec<String> = anchor.clone();
            for step in relative.split('/').filter(|s| !s.is_empty()) {
                if step == ".." {
                    resolved.pop();
                } else {
                    resolved.push(step.to_string());
                }
            }
            prop_assert_eq!(absolute(&resolved), target_path);
        }

        /// Property: a target below the anchor never needs `..`
        #[test]
        fn relativize_descendant_has_no_parent_steps(
            anchor in prop::collection::vec(segment(), 1..5),
            tail in prop::collection::vec(segment(), 1..5),
        ) {
            let mut target = anchor.clone();
            target.extend(tail.iter().cloned());
            let relative = relativize(&absolute(&target), &absolute(&anchor));
            prop_assert!(!relative.contains(".."));
            prop_assert_eq!(relative, tail.join("/"));
        }

        /// Property: the result never ends with a separator
        #[test]
        fn relativize_has_no_trailing_separator(
            target in prop::collection::vec(segment(), 1..6),
            anchor in prop::collection::vec(segment(), 1..6),
        ) {
            let relative = relativize(&absolute(&target), &absolute(&anchor));
            prop_assert!(!relative.ends_with('/') || relative.ends_with("../"));
        }
    }

    // ============================================================================
    // coordinate parsing property tests
    // ============================================================================

    fn field() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_.-]{1,12}"
    }

    proptest! {
        /// Property: the first three fields survive parsing unchanged
        #[test]
        fn parse_preserves_gav(
            fields in prop::collection::vec(field(), 3..=5),
        ) {
            let value = fields.join(":");
            let reference = FragmentReference::parse(&value, Path::new("/base")).unwrap();
            prop_assert_eq!(reference.coordinate.gav(), fields[..3].join(":"));
            prop_assert!(reference.location.is_none());
        }

        /// Property: fewer than three fields is always rejected
        #[test]
        fn parse_rejects_short_coordinates(
            fields in prop::collection::vec(field(), 1..3),
        ) {
            let value = fields.join(":");
            let result = FragmentReference::parse(&value, Path::new("/base"));
            let is_invalid_coordinate = matches!(result, Err(Error::InvalidCoordinate { .. }));
            prop_assert!(is_invalid_coordinate);
        }

        /// Property: the location suffix is joined to the base directory
        #[test]
        fn parse_joins_location(
            fields in prop::collection::vec(field(), 3..=5),
            location in prop::collection::vec(segment(), 1..4),
        ) {
            let relative = location.join("/");
            let value = format!("{}@{}", fields.join(":"), relative);
            let reference = FragmentReference::parse(&value, Path::new("/base")).unwrap();
            prop_assert_eq!(reference.location, Some(Path::new("/base").join(&relative)));
        }
    }
}
