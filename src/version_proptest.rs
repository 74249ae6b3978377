//! Property-based tests for version tag resolution.
//!
//! Tag sets are generated from a mix of semantic versions (with and without
//! a `v` prefix, some carrying build metadata) and arbitrary non-version
//! names.

#[cfg(test)]
mod proptest_tests {
    use crate::version::{filter, get_latest, parse_tag_version, sort, TagMap};
    use proptest::prelude::*;
    use std::cmp::Ordering;

    fn version_tag() -> impl Strategy<Value = String> {
        (
            0u64..4,
            0u64..6,
            0u64..6,
            any::<bool>(),
            prop::option::of("[a-z0-9]{1,4}"),
        )
            .prop_map(|(major, minor, patch, v, build)| {
                let build = build.map(|b| format!("+{}", b)).unwrap_or_default();
                format!("{}{}.{}.{}{}", if v { "v" } else { "" }, major, minor, patch, build)
            })
    }

    /// Precedence order, which ignores build metadata.
    fn precedence(a: &str, b: &str) -> Ordering {
        let a = parse_tag_version(a).unwrap();
        let b = parse_tag_version(b).unwrap();
        a.cmp_precedence(&b)
    }

    fn tag_name() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => version_tag(),
            1 => "[a-z]{1,8}",
            1 => "v?[0-9]\\.[0-9]",
        ]
    }

    fn tag_map() -> impl Strategy<Value = TagMap> {
        prop::collection::btree_map(tag_name(), "[0-9a-f]{8}", 0..16)
    }

    fn constraint() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            (0u64..4, 0u64..6).prop_map(|(major, minor)| format!("^{}.{}.0", major, minor)),
            (0u64..4, 0u64..6).prop_map(|(major, minor)| format!("~{}.{}", major, minor)),
            (0u64..4).prop_map(|major| format!(">=v{}.0.0, <{}.0.0", major, major + 2)),
            version_tag(),
        ]
    }

    proptest! {
        /// Filtering only ever removes entries, and never changes a hash.
        #[test]
        fn filter_returns_subset(tags in tag_map(), constraint in constraint()) {
            let filtered = filter(&tags, &constraint).unwrap();
            for (name, hash) in &filtered {
                prop_assert_eq!(tags.get(name), Some(hash));
                prop_assert!(parse_tag_version(name).is_some());
            }
        }

        /// An empty constraint keeps exactly the parseable tags.
        #[test]
        fn empty_constraint_keeps_all_versions(tags in tag_map()) {
            let filtered = filter(&tags, "").unwrap();
            let expected = tags
                .keys()
                .filter(|name| parse_tag_version(name).is_some())
                .count();
            prop_assert_eq!(filtered.len(), expected);
        }

        /// Sorted output is a permutation of the input in ascending order.
        #[test]
        fn sort_is_ascending_permutation(names in prop::collection::vec(version_tag(), 0..16)) {
            let sorted = sort(names.iter());
            prop_assert_eq!(sorted.len(), names.len());

            for pair in sorted.windows(2) {
                prop_assert!(
                    precedence(&pair[0], &pair[1]) != Ordering::Greater,
                    "{} sorted before {}",
                    pair[0],
                    pair[1]
                );
            }

            let mut expected = names.clone();
            expected.sort();
            let mut actual = sorted.clone();
            actual.sort();
            prop_assert_eq!(actual, expected);
        }

        /// Names of equal precedence keep their input order.
        #[test]
        fn sort_is_stable(names in prop::collection::vec(version_tag(), 0..16)) {
            let sorted = sort(names.iter());
            for name in &names {
                let same = |other: &&String| precedence(name, other) == Ordering::Equal;
                let in_input: Vec<&String> = names.iter().filter(same).collect();
                let in_output: Vec<&String> = sorted.iter().filter(same).collect();
                prop_assert_eq!(in_output, in_input);
            }
        }

        /// The latest tag is the last element of the sorted filtered set.
        #[test]
        fn latest_is_last_of_sorted_filter(tags in tag_map(), constraint in constraint()) {
            let filtered = filter(&tags, &constraint).unwrap();
            let sorted = sort(filtered.keys());
            let (tag, hash) = get_latest(&tags, &constraint).unwrap();

            match sorted.last() {
                Some(last) => {
                    prop_assert_eq!(&tag, last);
                    prop_assert_eq!(Some(&hash), tags.get(last));
                }
                None => {
                    prop_assert!(tag.is_empty());
                    prop_assert!(hash.is_empty());
                }
            }
        }
    }
}
