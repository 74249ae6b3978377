//! Property-based tests for dependency path resolution.
//!
//! These tests use proptest to generate random logical paths and verify that
//! resolution never produces a location outside the base directory.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{normalize, resolve};
    use proptest::prelude::*;
    use std::path::{Path, PathBuf};

    /// Segments drawn from plain names and the two special entries.
    fn segment() -> impl Strategy<Value = String> {
        prop_oneof![
            3 => "[a-z0-9_-]{1,8}",
            2 => Just("..".to_string()),
            1 => Just(".".to_string()),
        ]
    }

    fn logical_path() -> impl Strategy<Value = String> {
        prop::collection::vec(segment(), 1..8).prop_map(|parts| parts.join("/"))
    }

    /// Walks the segments the way a shell would and reports whether the
    /// path ever climbs above its starting point or ends on it.
    fn escapes_or_collapses(logical: &str) -> bool {
        let mut depth: i32 = 0;
        for part in logical.split('/') {
            match part {
                "." | "" => {}
                ".." => {
                    depth -= 1;
                    if depth < 0 {
                        return true;
                    }
                }
                _ => depth += 1,
            }
        }
        depth == 0
    }

    // ============================================================================
    // resolve property tests
    // ============================================================================

    proptest! {
        /// Property: a successful resolution always lands strictly below the base
        #[test]
        fn resolve_never_leaves_base(logical in logical_path()) {
            let base = PathBuf::from("/work/project");
            if let Ok(full) = resolve(&base, &logical) {
                prop_assert!(full.starts_with(&base));
                prop_assert_ne!(full.as_path(), base.as_path());
                prop_assert!(
                    !full.components().any(|c| c.as_os_str() == ".."),
                    "resolved path '{}' still contains a parent segment",
                    full.display()
                );
            }
        }

        /// Property: resolution fails exactly when the walk escapes or collapses
        #[test]
        fn resolve_rejects_exactly_the_escapes(logical in logical_path()) {
            let base = Path::new("/work/project");
            let result = resolve(base, &logical);
            prop_assert_eq!(
                result.is_err(),
                escapes_or_collapses(&logical),
                "unexpected outcome for '{}': {:?}",
                logical,
                result
            );
        }

        /// Property: resolve is deterministic (same input = same output)
        #[test]
        fn resolve_is_deterministic(logical in logical_path()) {
            let base = Path::new("/work/project");
            let first = resolve(base, &logical).ok();
            let second = resolve(base, &logical).ok();
            prop_assert_eq!(first, second);
        }

        /// Property: plain relative names always resolve to base joined with the name
        #[test]
        fn resolve_plain_names_join(parts in prop::collection::vec("[a-z0-9_]{1,8}", 1..5)) {
            let base = Path::new("/work/project");
            let logical = parts.join("/");
            let full = resolve(base, &logical).unwrap();
            prop_assert_eq!(full, base.join(&logical));
        }

        /// Property: the normalized form resolves to the same place and is a fixed point
        #[test]
        fn normalize_is_canonical(logical in logical_path()) {
            let base = Path::new("/work/project");
            if let Ok(canonical) = normalize(&logical) {
                prop_assert_eq!(resolve(base, &canonical).unwrap(), resolve(base, &logical).unwrap());
                prop_assert_eq!(normalize(&canonical).unwrap(), canonical.clone());
                prop_assert!(!canonical.split('/').any(|s| s == "." || s == ".." || s.is_empty()));
            } else {
                prop_assert!(resolve(base, &logical).is_err());
            }
        }
    }
}
