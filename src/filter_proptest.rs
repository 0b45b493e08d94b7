//! Property-based tests for path filtering and target path construction.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::filter::PathFilter;
    use crate::path::{apply_file_prefix, strip_base_path};
    use proptest::prelude::*;

    /// Straightforward backtracking `fnmatch`, used as the oracle for the
    /// compiled patterns. Supports `*`, `?` and closed `[...]`/`[!...]`
    /// classes with ranges.
    fn reference_match(pattern: &[char], path: &[char]) -> bool {
        match pattern.split_first() {
            None => path.is_empty(),
            Some(('*', rest)) => (0..=path.len()).any(|k| reference_match(rest, &path[k..])),
            Some(('?', rest)) => !path.is_empty() && reference_match(rest, &path[1..]),
            Some(('[', rest)) => match reference_class(rest) {
                Some((accepts, len)) => match path.split_first() {
                    Some((c, tail)) => accepts(*c) && reference_match(&rest[len..], tail),
                    None => false,
                },
                None => path.first() == Some(&'[') && reference_match(rest, &path[1..]),
            },
            Some((c, rest)) => path.first() == Some(c) && reference_match(rest, &path[1..]),
        }
    }

    /// Parse a class body; returns its predicate and the number of pattern
    /// characters consumed, closing `]` included.
    fn reference_class(body: &[char]) -> Option<(impl Fn(char) -> bool, usize)> {
        let negated = body.first() == Some(&'!');
        let start = usize::from(negated);
        let close = (start + 1..body.len())
            .find(|&j| body[j] == ']')
            .filter(|_| start < body.len())?;
        let members: Vec<char> = body[start..close].to_vec();
        let accepts = move |c: char| {
            let mut hit = false;
            let mut k = 0;
            while k < members.len() {
                if k + 2 < members.len() && members[k + 1] == '-' {
                    hit |= members[k] <= c && c <= members[k + 2];
                    k += 3;
                } else {
                    hit |= members[k] == c;
                    k += 1;
                }
            }
            hit != negated
        };
        Some((accepts, close + 1))
    }

    fn fnmatch(pattern: &str, path: &str) -> bool {
        let pattern: Vec<char> = pattern.chars().collect();
        let path: Vec<char> = path.chars().collect();
        reference_match(&pattern, &path)
    }

    // ============================================================================
    // PathFilter property tests
    // ============================================================================

    fn segment() -> impl Strategy<Value = String> {
        "[a-z0-9_]{1,8}"
    }

    fn rel_path() -> impl Strategy<Value = String> {
        prop::collection::vec(segment(), 1..4).prop_map(|parts| parts.join("/"))
    }

    fn pattern() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("*".to_string()),
            Just("*.yaml".to_string()),
            Just("**/*.yml".to_string()),
            Just("**/test/*".to_string()),
            Just("*/test/*".to_string()),
            Just("[a-m]*".to_string()),
            Just("[!a-m]*".to_string()),
            Just("?*".to_string()),
            Just("*/?.yaml".to_string()),
            "[a-z*?/.]{0,6}",
            rel_path(),
        ]
    }

    #[test]
    fn reference_agrees_with_known_results() {
        assert!(!fnmatch("**/*.yaml", "redis.yaml"));
        assert!(fnmatch("**/*.yaml", "a/redis.yaml"));
        assert!(!fnmatch("**/test/*", "test/a.yaml"));
        assert!(fnmatch("types**.yaml", "types/a/b.yaml"));
        assert!(fnmatch("[!a]x", "bx"));
        assert!(!fnmatch("[!a]x", "ax"));
    }

    proptest! {
        /// Property: the filter accepts exactly when base path, include, and
        /// exclude checks all pass under `fnmatch` rules
        #[test]
        fn filter_matches_definition(
            base in prop_oneof![Just(String::new()), segment().prop_map(|s| format!("{}/", s))],
            path in rel_path(),
            ext in prop_oneof![Just(".yaml"), Just(".yml"), Just(".md")],
            include in prop::collection::vec(pattern(), 0..3),
            exclude in prop::collection::vec(pattern(), 0..3),
        ) {
            let full = format!("{}{}{}", base, path, ext);
            let filter = PathFilter::new(&base, &include, &exclude).unwrap();

            let matches = |patterns: &[String]| patterns.iter().any(|p| fnmatch(p, &full));
            let expected = full.starts_with(&base) && matches(&include) && !matches(&exclude);

            prop_assert_eq!(filter.matches(&full), expected);
        }

        /// Property: paths outside the base path are always rejected
        #[test]
        fn filter_rejects_outside_base(path in rel_path()) {
            let filter = PathFilter::new("ZZZ/", &["*"], &[]).unwrap();
            prop_assert!(!filter.matches(&path));
        }

        /// Property: an exclude pattern identical to an include pattern rejects
        /// everything
        #[test]
        fn filter_exclude_overrides_include(path in rel_path(), p in pattern()) {
            let filter = PathFilter::new("", &[p.clone()], &[p]).unwrap();
            prop_assert!(!filter.matches(&path));
        }
    }

    // ============================================================================
    // Target path property tests
    // ============================================================================

    proptest! {
        /// Property: an empty prefix is the identity
        #[test]
        fn empty_prefix_is_identity(path in rel_path()) {
            prop_assert_eq!(apply_file_prefix(&path, ""), path);
        }

        /// Property: the prefix lands on the file name and the directory part is
        /// untouched
        #[test]
        fn prefix_applies_to_file_name(path in rel_path(), prefix in "[a-z_]{1,6}") {
            let result = apply_file_prefix(&path, &prefix);
            let (dir, file) = match path.rsplit_once('/') {
                Some((dir, file)) => (Some(dir), file),
                None => (None, path.as_str()),
            };
            match dir {
                Some(dir) => prop_assert_eq!(result, format!("{}/{}{}", dir, prefix, file)),
                None => prop_assert_eq!(result, format!("{}{}", prefix, file)),
            }
        }

        /// Property: prefixing never changes the number of path segments
        #[test]
        fn prefix_preserves_depth(path in rel_path(), prefix in "[a-z_]{0,6}") {
            let result = apply_file_prefix(&path, &prefix);
            prop_assert_eq!(result.split('/').count(), path.split('/').count());
        }

        /// Property: stripping the base path recovers the relative path
        #[test]
        fn strip_base_path_roundtrip(base in segment(), path in rel_path()) {
            let full = format!("{}/{}", base, path);
            prop_assert_eq!(strip_base_path(&full, &base), path.as_str());
        }
    }
}
