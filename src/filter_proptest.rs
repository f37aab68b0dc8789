//! Property-based tests for the filter pipeline.
//!
//! These tests use proptest to generate random repository lists and verify
//! that the filter stages behave for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::filter::{filter_by_ignore_list, filter_by_prefix, filter_by_regex, FilterPipeline};
    use crate::repo::RepoDescriptor;
    use proptest::prelude::*;
    use regex::Regex;

    fn repos_from(names: &[String]) -> Vec<RepoDescriptor> {
        names
            .iter()
            .map(|n| RepoDescriptor::new(format!("https://host/org/{}.git", n)))
            .collect()
    }

    fn urls(repos: &[RepoDescriptor]) -> Vec<String> {
        repos.iter().map(|r| r.url.clone()).collect()
    }

    /// True when `sub` appears in `all` in the same relative order.
    fn is_subsequence(sub: &[String], all: &[String]) -> bool {
        let mut rest = all.iter();
        sub.iter().all(|s| rest.any(|a| a == s))
    }

    fn names() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z][a-z0-9-]{0,12}", 0..30)
    }

    // ============================================================================
    // regex filter property tests
    // ============================================================================

    proptest! {
        /// Property: applying the regex filter twice equals applying it once
        #[test]
        fn regex_filter_is_idempotent(names in names(), pattern in "[a-z]{1,3}") {
            let re = Regex::new(&pattern).unwrap();
            let once = filter_by_regex(repos_from(&names), &re);
            let twice = filter_by_regex(once.clone(), &re);
            prop_assert_eq!(urls(&once), urls(&twice));
        }

        /// Property: the regex filter keeps survivors in input order
        #[test]
        fn regex_filter_never_reorders(names in names(), pattern in "[a-z]{1,2}") {
            let re = Regex::new(&pattern).unwrap();
            let input = repos_from(&names);
            let output = filter_by_regex(input.clone(), &re);
            prop_assert!(is_subsequence(&urls(&output), &urls(&input)));
        }

        /// Property: every survivor of the regex filter matches the pattern
        #[test]
        fn regex_filter_keeps_only_matches(names in names(), pattern in "[a-z]{1,2}") {
            let re = Regex::new(&pattern).unwrap();
            for repo in filter_by_regex(repos_from(&names), &re) {
                prop_assert!(re.is_match(repo.app_name()));
            }
        }
    }

    // ============================================================================
    // prefix and ignore-list property tests
    // ============================================================================

    proptest! {
        /// Property: every survivor starts with one of the prefixes
        #[test]
        fn prefix_filter_keeps_only_prefixed(
            names in names(),
            prefixes in prop::collection::vec("[a-z]{1,2}", 1..4),
        ) {
            for repo in filter_by_prefix(repos_from(&names), &prefixes) {
                prop_assert!(prefixes.iter().any(|p| repo.app_name().starts_with(p.as_str())));
            }
        }

        /// Property: no survivor of the ignore filter contains an ignored substring
        #[test]
        fn ignore_filter_drops_every_listed_substring(
            names in names(),
            ignored in prop::collection::vec("[a-z]{2,4}", 0..4),
        ) {
            let input = repos_from(&names);
            let output = filter_by_ignore_list(input.clone(), &ignored);
            for repo in &output {
                prop_assert!(ignored.iter().all(|i| !repo.url.contains(i.as_str())));
            }
            prop_assert!(is_subsequence(&urls(&output), &urls(&input)));
        }

        /// Property: a pipeline with no stages configured keeps every code repository
        #[test]
        fn empty_pipeline_is_identity(names in names()) {
            let input = repos_from(&names);
            let output = FilterPipeline::default().apply(input.clone());
            prop_assert_eq!(urls(&output), urls(&input));
        }
    }
}
